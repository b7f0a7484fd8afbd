// Application layer - use cases and the traits they depend on
pub mod dashboard_host;
pub mod events;
pub mod rotation_controller;
pub mod values_repository;

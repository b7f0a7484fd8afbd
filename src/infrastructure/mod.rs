// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod jaql_repository;
pub mod snapshot_host;

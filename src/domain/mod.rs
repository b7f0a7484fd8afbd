// Domain layer - dashboard, filter and menu models
pub mod dashboard;
pub mod filter;
pub mod menu;
pub mod values_cache;

// Rotating filter values for BI dashboards
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

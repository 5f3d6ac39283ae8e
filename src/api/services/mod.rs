pub mod health;
pub mod views;

pub use health::{AppStartTime, HealthService, health_routes};
pub use views::{ViewHandlers, view_routes};

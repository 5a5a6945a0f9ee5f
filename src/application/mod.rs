pub mod dashboard_service;
pub mod registration_service;
pub mod scheduler_service;
pub mod sensor_service;

pub use dashboard_service::DashboardService;
pub use registration_service::RegistrationService;
pub use scheduler_service::{TickOutcome, UpdateScheduler};
pub use sensor_service::SensorRegistry;

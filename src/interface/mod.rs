pub mod dashboard_view_trait;
pub mod sensor_source_trait;

pub use dashboard_view_trait::{DashboardView, SessionCredential};
pub use sensor_source_trait::SensorSource;

pub mod autostart;
pub mod dashboard;
pub mod network;
pub mod registration;
pub mod sensor;
pub mod setting;

pub mod device;
pub mod sensor;

pub use device::{DeviceIdentity, DeviceMetadata, Language, RegistrationState};
pub use sensor::{SensorDescriptor, SensorListItem, SensorReading};

pub mod connection;
pub mod system;
pub mod temperature;

pub use connection::{ConnectionStatus, SensorConnection};
pub use system::{Channel, SharedSensors, SystemSensorsState};
pub use temperature::TemperatureStatus;

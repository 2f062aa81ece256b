pub mod alerts;
pub mod feedback;
pub mod logs;
pub mod sensor_data;
pub mod sensors;
pub mod system_status;
pub mod temperature_logs;
pub mod weather;

pub use alerts::{Alert, AlertLevel};
pub use feedback::{FeedbackAck, FeedbackEntry, FeedbackInput};
pub use logs::{LogAck, LoginLogEntry, LoginLogInput, LoginStatus};
pub use sensor_data::{
    ReadingFilter, ReadingKind, ReadingSource, SensorDataCreated, SensorDataQuery,
    SensorDataResponse, SensorReading, SensorReadingInput, StorageReport,
};
pub use sensors::SensorStateResponse;
pub use system_status::{
    SystemStatusCreated, SystemStatusInput, SystemStatusRecord, SystemStatusResponse,
};
pub use temperature_logs::{
    TemperatureLogCreated, TemperatureLogEntry, TemperatureLogInput, TemperatureLogQuery,
    TemperatureLogResponse,
};
pub use weather::{CityForecast, DayForecast, WeatherResponse};

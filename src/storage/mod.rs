pub mod file;
pub mod ring;

pub use file::JsonFileStore;
pub use ring::BoundedLog;

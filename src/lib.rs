//! Solar installation monitor: sensor ingestion API, live sensor aggregate,
//! and the background poller that keeps the aggregate fresh.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod poller;
pub mod repositories;
pub mod sensors;
pub mod services;
pub mod storage;

pub use api::{create_router, AppState};
pub use config::Config;
pub use error::{AppError, Result};

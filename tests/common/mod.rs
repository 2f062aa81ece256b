#![allow(dead_code)]

use solar_monitor::config::Config;
use std::path::PathBuf;

/// A config writing to its own scratch directory and never touching a database.
pub fn test_config(memory_capacity: usize) -> Config {
    let mut cfg = Config::default();
    cfg.storage.memory_capacity = memory_capacity;
    cfg.storage.data_dir = scratch_dir();
    cfg.database = None;
    cfg.poller = None;
    cfg
}

pub fn scratch_dir() -> PathBuf {
    std::env::temp_dir().join(format!("solar-monitor-it-{}", uuid::Uuid::new_v4()))
}

/// Binds an ephemeral port and serves `router` in the background.
pub async fn spawn_server(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

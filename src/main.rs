use solar_monitor::{
    api::{create_router, AppState},
    config::Config,
    db,
    poller::SensorPoller,
    sensors::SystemSensorsState,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    info!("Starting solar-monitor");

    let cfg_path = std::env::var("APP_CONFIG").unwrap_or_else(|_| "config/config.yaml".into());
    let cfg = Config::load(&cfg_path)?;
    info!("Configuration loaded from {}", cfg_path);

    // The database is a mirror; the API keeps serving from memory and files without it.
    let pool = match &cfg.database {
        Some(db_cfg) => match db::connect(db_cfg).await {
            Ok(pool) => match db::ensure_schema(&pool).await {
                Ok(()) => {
                    info!("Connected to database");
                    Some(pool)
                }
                Err(e) => {
                    warn!(error = %e, "database schema setup failed; continuing without database");
                    None
                }
            },
            Err(e) => {
                warn!(error = %e, "database unavailable; continuing without database");
                None
            }
        },
        None => None,
    };

    let sensors = SystemSensorsState::shared();
    let state = AppState::with_sensors(&cfg, pool, sensors.clone())?;

    let poller_handle = match &cfg.poller {
        Some(poller_cfg) => {
            let poller = SensorPoller::new(poller_cfg, sensors)?;
            Some(tokio::spawn(poller.run()))
        }
        None => {
            info!("No poller configured");
            None
        }
    };

    let router = create_router(state);
    let addr = format!("{}:{}", cfg.server.host, cfg.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", addr, e))?;

    info!("API server listening on {}", addr);

    if let Err(e) = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "API server error");
    }

    if let Some(handle) = poller_handle {
        handle.abort();
        info!("Sensor poller stopped");
    }

    info!("Application shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully");
        },
    }
}

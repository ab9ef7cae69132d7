//! Task Tracker API
//!
//! Serves the task API over HTTP, backed by a line-delimited JSON file.
//!
//! # Environment Variables
//!
//! - `TASKS_FILE`: backing file, must already exist (default: `tasks.txt`)
//! - `HOST`: Server host address (default: `0.0.0.0`)
//! - `PORT`: Server port (default: `8000`)
//! - `TASK_ID_STRATEGY`: `count` (default) | `max`
//! - `WRITE_MODE`: `overwrite` (default) | `atomic`
//! - `WORKER_THREADS`: Number of tokio worker threads (default: logical CPU count)
//! - `LOG_FORMAT`: `text` (default) | `json`
//! - `RUST_LOG`: Logging level (e.g., `debug`, `info`, `task_tracker_api=debug`)

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use task_tracker_api::api::{AppState, application};
use task_tracker_api::infrastructure::{
    JsonLinesStorage, LogFormat, ServiceConfig, TaskStorage, TaskStore,
};

fn main() {
    dotenvy::dotenv().ok();

    let config = match ServiceConfig::from_env() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("Configuration error: {error}");
            std::process::exit(1);
        }
    };

    init_tracing(config.log_format);

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(threads) = config.worker_threads {
        builder.worker_threads(threads);
    }

    let runtime = match builder.build() {
        Ok(runtime) => runtime,
        Err(error) => {
            tracing::error!(%error, "Failed to create tokio runtime");
            std::process::exit(1);
        }
    };

    runtime.block_on(async_main(config));
}

fn init_tracing(log_format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "task_tracker_api=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    match log_format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

async fn async_main(config: ServiceConfig) {
    tracing::info!(
        tasks_file = %config.tasks_file.display(),
        id_strategy = ?config.id_strategy,
        write_mode = ?config.write_mode,
        "Starting Task Tracker API"
    );

    let storage: Arc<dyn TaskStorage> = Arc::new(
        JsonLinesStorage::new(&config.tasks_file).with_write_mode(config.write_mode),
    );

    // No in-memory fallback: an unreadable backing file is fatal.
    let store = match TaskStore::open(storage, config.id_strategy) {
        Ok(store) => store,
        Err(error) => {
            tracing::error!(%error, "Failed to load tasks");
            std::process::exit(1);
        }
    };

    let application = application(AppState::new(store));

    let address = match config.socket_address() {
        Ok(address) => address,
        Err(error) => {
            tracing::error!(%error, "Invalid server address");
            std::process::exit(1);
        }
    };

    let listener = match TcpListener::bind(address).await {
        Ok(listener) => listener,
        Err(error) => {
            tracing::error!(%error, "Failed to bind to address {}", address);
            std::process::exit(1);
        }
    };

    match listener.local_addr() {
        Ok(address) => tracing::info!("Listening on {}", address),
        Err(error) => tracing::warn!(%error, "Could not determine local address"),
    }

    if let Err(error) = axum::serve(listener, application)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(%error, "Server error");
        std::process::exit(1);
    }

    tracing::info!("Server shutdown complete");
}

/// Completes on SIGINT (Ctrl+C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::warn!(%error, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::warn!(%error, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

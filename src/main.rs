//! # Search History Server Main Driver
//!
//! ## Purpose
//! Main entry point for the search-history server. Wires configuration,
//! logging, the backend client and the query engine together and serves
//! the REST API until shutdown.
//!
//! ## Architecture Flow
//! 1. Parse command line arguments and load configuration
//! 2. Initialize logging and tracing
//! 3. Build the backend client and query engine
//! 4. Start the web API server
//! 5. Handle shutdown signals gracefully

use clap::{Arg, Command};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use search_history_engine::{
    api::ApiServer,
    backend::{BackendClient, HistoryQuery},
    config::Config,
    engine::QueryEngine,
    errors::{EngineError, Result},
    AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("history-search-server")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Legal Search Team")
        .about("Query engine over past publication searches")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("config.toml"),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Server port")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("check-health")
                .long("check-health")
                .help("Probe the backend and exit")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let config_path = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or("config.toml");
    let mut config = Config::from_file(config_path)?;

    if let Some(port) = matches.get_one::<u16>("port") {
        config.server.port = *port;
    }

    let config = Arc::new(config);

    init_logging(&config)?;

    info!("Starting search-history engine v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration loaded from: {}", config_path);

    let app_state = initialize_components(config.clone())?;

    if matches.get_flag("check-health") {
        return run_health_checks(&app_state).await;
    }

    let server = ApiServer::new(app_state.clone());

    info!(
        "Search-history engine started on {}:{}",
        config.server.host, config.server.port
    );

    // The actix server future is not Send, so it is awaited here rather
    // than spawned onto the runtime.
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        result = server.run() => {
            match result {
                Ok(()) => warn!("Server stopped unexpectedly"),
                Err(e) => error!("Server error: {}", e),
            }
        }
    }

    info!("Search-history engine shut down");
    Ok(())
}

/// Initialize logging and tracing
fn init_logging(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_new(&config.logging.level).map_err(|_| EngineError::Config {
        message: format!("Invalid log level: {}", config.logging.level),
    })?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if config.logging.json_format {
        builder.json().init();
    } else {
        builder.init();
    }

    info!("Logging initialized with level: {}", config.logging.level);
    Ok(())
}

/// Build the backend client, query engine and shared state
fn initialize_components(config: Arc<Config>) -> Result<AppState> {
    info!("Initializing application components...");

    let backend = Arc::new(BackendClient::new(config.backend.clone())?);
    let engine = Arc::new(QueryEngine::new(backend.clone(), config.engine.clone()));

    info!("All components initialized successfully");
    Ok(AppState {
        config,
        backend,
        engine,
    })
}

/// Probe the backend once and report the outcome
async fn run_health_checks(app_state: &AppState) -> Result<()> {
    info!("Running health checks...");

    app_state
        .backend
        .list_history(HistoryQuery {
            limit: 1,
            ..HistoryQuery::default()
        })
        .await?;

    info!("Backend is reachable; all health checks passed");
    Ok(())
}

//! MediaRate REST backend.
//!
//! Users register and log in, catalog media items, rate them with moderated
//! comments, keep favorites, and get recommendations scored from their own
//! rating history.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::info;

use api::{router, routes, AppState};
use pg_store::{
    schema, PgClient, PgConfig, PgFavoriteStore, PgMediaStore, PgRatingStore, PgSessionStore,
    PgUserStore,
};
use telemetry::{init_tracing, TracingConfig};

/// Application configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,

    /// Tracing filter, e.g. "info" or "mediarate=debug"
    #[serde(default = "default_log_filter")]
    log_filter: String,
    /// Emit JSON log lines instead of human-readable ones
    #[serde(default)]
    log_json: bool,

    #[serde(default)]
    database: PgConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_filter: default_log_filter(),
            log_json: false,
            database: PgConfig::default(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = load_config()?;

    init_tracing(
        TracingConfig::new()
            .with_filter(config.log_filter.clone())
            .with_json(config.log_json),
    );

    info!("Starting MediaRate v{}", env!("CARGO_PKG_VERSION"));

    let client = PgClient::connect(&config.database)
        .await
        .context("Failed to connect to PostgreSQL")?;

    schema::init_schema(&client)
        .await
        .context("Failed to initialize database schema")?;

    let state = AppState::new(
        Arc::new(PgUserStore::new(client.clone())),
        Arc::new(PgMediaStore::new(client.clone())),
        Arc::new(PgRatingStore::new(client.clone())),
        Arc::new(PgFavoriteStore::new(client.clone())),
        Arc::new(PgSessionStore::new(client)),
    );

    let dispatcher = Arc::new(routes::registry(state));
    let app = router(dispatcher);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid server address")?;

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutdown complete");
    Ok(())
}

/// Load configuration from files and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        .add_source(config::Config::try_from(&Config::default())?)
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("MEDIARATE")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // The conventional DATABASE_URL wins over everything else.
    if let Ok(url) = std::env::var("DATABASE_URL") {
        config.database.url = url;
    }

    Ok(config)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}

//! evalform-server - evaluation intake and review service
//!
//! Resolves configuration (CLI, environment, TOML file, defaults), opens the
//! SQLite store and serves the HTTP API until Ctrl+C or SIGTERM.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use evalform_common::config::{load_toml_config, ConfigOverrides, ServiceConfig};
use evalform_common::db::init_database;
use evalform_server::{build_router, AppState, EvaluationStore, HttpSettings};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for evalform-server
#[derive(Parser, Debug)]
#[command(name = "evalform-server")]
#[command(about = "Evaluation form intake and review service")]
#[command(version)]
struct Args {
    /// TOML config file (defaults to the platform config directory)
    #[arg(short, long, env = "EVALFORM_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "EVALFORM_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "EVALFORM_PORT")]
    port: Option<u16>,

    /// SQLite database file
    #[arg(short, long, env = "EVALFORM_DATABASE")]
    database: Option<PathBuf>,

    /// Maximum pooled database connections
    #[arg(long, env = "EVALFORM_MAX_CONNECTIONS")]
    max_connections: Option<u32>,

    /// Folder with dashboard.html and static assets
    #[arg(long, env = "EVALFORM_STATIC_DIR")]
    static_dir: Option<PathBuf>,

    /// Allowed CORS origins, comma separated
    #[arg(long, env = "EVALFORM_CORS_ORIGINS", value_delimiter = ',')]
    cors_origins: Option<Vec<String>>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            host: self.host.clone(),
            port: self.port,
            database_path: self.database.clone(),
            static_dir: self.static_dir.clone(),
            cors_origins: self.cors_origins.clone(),
            max_connections: self.max_connections,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "evalform_server=info,evalform_common=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting evalform-server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let file_config = load_toml_config(args.config.as_deref()).context("Failed to load config file")?;
    let config = ServiceConfig::resolve(&args.overrides(), file_config.as_ref());
    info!("Database path: {}", config.database_path.display());

    let pool = init_database(&config.database_path, &config.pool)
        .await
        .with_context(|| format!("Failed to open database {}", config.database_path.display()))?;
    info!("Database ready");

    let state = AppState::new(EvaluationStore::new(pool.clone()));
    let app = build_router(state, &HttpSettings::from(&config));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", config.host, config.port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("evalform-server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    pool.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
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
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_cli_overrides_environment() {
        std::env::set_var("EVALFORM_PORT", "4000");
        let args = Args::try_parse_from(["evalform-server", "--port", "5000"]).unwrap();
        std::env::remove_var("EVALFORM_PORT");

        assert_eq!(args.overrides().port, Some(5000));
    }

    #[test]
    #[serial]
    fn test_environment_fills_unset_arguments() {
        std::env::set_var("EVALFORM_CORS_ORIGINS", "http://a.test,http://b.test");
        std::env::set_var("EVALFORM_DATABASE", "/tmp/evals.db");
        let args = Args::try_parse_from(["evalform-server"]).unwrap();
        std::env::remove_var("EVALFORM_CORS_ORIGINS");
        std::env::remove_var("EVALFORM_DATABASE");

        let overrides = args.overrides();
        assert_eq!(
            overrides.cors_origins,
            Some(vec!["http://a.test".to_string(), "http://b.test".to_string()])
        );
        assert_eq!(overrides.database_path, Some(PathBuf::from("/tmp/evals.db")));
        assert_eq!(overrides.host, None);
    }

    #[test]
    #[serial]
    fn test_unset_arguments_defer_to_config() {
        let args = Args::try_parse_from(["evalform-server"]).unwrap();
        let config = ServiceConfig::resolve(&args.overrides(), None);
        assert_eq!(config, ServiceConfig::default());
    }
}

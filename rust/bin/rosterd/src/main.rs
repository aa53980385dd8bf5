//! `rosterd` — the Roster server binary.
//!
//! Usage:
//!   DATABASE_URL=redb://data/roster.redb rosterd [--port <port>] [--public-dir <dir>]
//!
//! Every flag falls back to its environment variable. `DATABASE_URL` is
//! required; the server refuses to start without it.

mod method_override;
mod routes;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::anyhow;
use axum::ServiceExt;
use clap::Parser;
use roster_core::{Module, ServiceConfig};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

/// Roster server.
#[derive(Parser, Debug)]
#[command(name = "rosterd", about = "Roster server")]
struct Cli {
    /// Record store connection string: redb://PATH, file://PATH or a plain path.
    #[arg(long = "database-url", env = "DATABASE_URL")]
    database_url: String,

    /// HTTP port.
    #[arg(long = "port", env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Directory of static assets.
    #[arg(long = "public-dir", env = "PUBLIC_DIR", default_value = "public")]
    public_dir: PathBuf,
}

impl From<Cli> for ServiceConfig {
    fn from(cli: Cli) -> Self {
        ServiceConfig {
            database_url: cli.database_url,
            port: cli.port,
            public_dir: cli.public_dir,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = ServiceConfig::from(Cli::parse());

    // Open the record store once; every handler shares this handle.
    let db_path = config
        .resolve_db_path()
        .ok_or_else(|| anyhow!("DATABASE_URL does not name a database path"))?;
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let kv: Arc<dyn roster_kv::KVStore> = Arc::new(
        roster_kv::RedbStore::open(&db_path)
            .map_err(|e| anyhow!("failed to open record store: {}", e))?,
    );
    info!("Record store opened at {}", db_path.display());

    let student_module = roster_student::StudentModule::new(Arc::clone(&kv))
        .map_err(|e| anyhow!("failed to initialize student module: {}", e))?;
    info!("Student module initialized");

    let module_routes = vec![student_module.routes()];
    let router = routes::build_router(module_routes, &config.public_dir);
    let app = routes::build_app(router);

    let address = config.listen_addr();
    let listener = TcpListener::bind(&address).await?;
    info!("Server is running on port {}", config.port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => error!("Failed to listen for Ctrl+C: {}", e),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flags_map_to_config() {
        let cli = Cli::try_parse_from([
            "rosterd",
            "--database-url=redb:///tmp/roster.redb",
            "--port=8080",
            "--public-dir=assets",
        ])
        .unwrap();
        let config = ServiceConfig::from(cli);
        assert_eq!(config.resolve_db_path(), Some(PathBuf::from("/tmp/roster.redb")));
        assert_eq!(config.listen_addr(), "0.0.0.0:8080");
        assert_eq!(config.public_dir, PathBuf::from("assets"));
    }
}

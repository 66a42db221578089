//! Biopass server - HTTP backend for the fingerprint attendance system
//!
//! The scanner agent polls `/check-enrollment-requests` and posts scans
//! to `/attendance`; the admin frontend drives the remaining routes.

use anyhow::Result;
use biopass_business::{LogNotifier, NotifierConfig, ServiceContext};
use biopass_persistence::Database;
use clap::Parser;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod http;

use http::AppState;

/// Biopass - fingerprint attendance backend
#[derive(Parser)]
#[command(name = "biopass-server")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0:3001")]
    listen: SocketAddr,

    /// SQLite database URL
    #[arg(long, default_value = "sqlite:data/biopass.db")]
    database_url: String,

    /// Sender name for guardian notifications
    #[arg(long, default_value = "The Community Link Team")]
    sender_name: String,

    /// Sender address for guardian notifications
    #[arg(long, default_value = "attendance@communitylink.example")]
    sender_email: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    "biopass_server=info,biopass_business=info,biopass_persistence=info,tower_http=info"
                        .into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    ensure_parent_dir(&cli.database_url)?;
    let db = Database::open(&cli.database_url).await?;
    tracing::info!(database_url = %cli.database_url, "database ready");

    let state = AppState {
        ctx: ServiceContext::new(&db),
        notifier: Arc::new(LogNotifier::new(NotifierConfig {
            sender_name: cli.sender_name,
            sender_email: cli.sender_email,
        })),
    };

    let app = http::router(state);

    let listener = tokio::net::TcpListener::bind(cli.listen).await?;
    tracing::info!("Biopass server running on http://{}", cli.listen);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the directory a file-backed SQLite URL points into.
fn ensure_parent_dir(database_url: &str) -> Result<()> {
    if let Some(path) = database_url.strip_prefix("sqlite:") {
        let path = path.strip_prefix("//").unwrap_or(path);
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
    }
    Ok(())
}

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use nda_core::{Config, Error, Result};
use nda_storage::{MemoryStore, PgStore};
use nda_web::{create_app, AppState};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Storage backend to use: postgres (default) or memory
    #[arg(long, default_value = "postgres")]
    storage: String,
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    port: Option<u16>,
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(database_url) = cli.database_url {
        config.database_url = database_url;
    }

    let app = match cli.storage.as_str() {
        "memory" => {
            info!("💾 Using in-memory storage");
            create_app(AppState::new(Arc::new(MemoryStore::new()), config.clone()))
        }
        "postgres" => {
            info!("💾 Connecting to {}", config.database_url);
            let store = PgStore::connect(&config.database_url).await?;
            info!("✨ Storage initialized successfully");
            create_app(AppState::new(Arc::new(store), config.clone()))
        }
        other => {
            return Err(Error::Config(format!("unknown storage backend: {}", other)));
        }
    };

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🚀 News digest API listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

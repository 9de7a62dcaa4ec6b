//! profilestore Server Binary
//!
//! Starts the HTTP Query Service.

use std::path::PathBuf;

use clap::Parser;
use profilestore::config::{DEFAULT_DB_PATH, DEFAULT_LISTEN_ADDR};
use profilestore::network::Server;
use profilestore::{logging, Config, ProfileError};

/// profilestore Server
#[derive(Parser, Debug)]
#[command(name = "profilestore-server")]
#[command(about = "Read-only HTTP lookups over the user profile database")]
#[command(version)]
struct Args {
    /// Database file produced by profilestore-load
    #[arg(short, long, default_value = DEFAULT_DB_PATH)]
    db: PathBuf,

    /// Listen address (host:port)
    #[arg(short, long, default_value = DEFAULT_LISTEN_ADDR)]
    listen: String,
}

#[tokio::main]
async fn main() {
    logging::init("info,profilestore=debug");

    let args = Args::parse();

    tracing::info!("profilestore server v{}", profilestore::VERSION);
    tracing::info!("Database: {}", args.db.display());
    tracing::info!("Listen address: {}", args.listen);

    let config = Config::builder()
        .db_path(&args.db)
        .listen_addr(&args.listen)
        .build();

    if let Err(e) = Server::new(config).run().await {
        tracing::error!("Server error: {}", e);
        if matches!(e, ProfileError::DatabaseMissing(_)) {
            tracing::error!("Run profilestore-load first to create the database");
        }
        std::process::exit(1);
    }
}

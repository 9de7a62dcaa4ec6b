//! profilestore Loader Binary
//!
//! Builds the profile database from a Parquet file.

use std::path::PathBuf;

use clap::Parser;
use profilestore::config::{DEFAULT_COMPRESSION_LEVEL, DEFAULT_DB_PATH, DEFAULT_SOURCE_PATH};
use profilestore::{logging, Config, Loader};

/// profilestore Loader
#[derive(Parser, Debug)]
#[command(name = "profilestore-load")]
#[command(about = "Load a Parquet file of user profiles into an indexed database")]
#[command(version)]
struct Args {
    /// Source Parquet file
    #[arg(short, long, default_value = DEFAULT_SOURCE_PATH)]
    source: PathBuf,

    /// Database file to create
    #[arg(short, long, default_value = DEFAULT_DB_PATH)]
    db: PathBuf,

    /// Replace the database file if it already exists
    #[arg(short, long)]
    force: bool,

    /// zstd level for text and blob columns
    #[arg(long, default_value_t = DEFAULT_COMPRESSION_LEVEL, allow_negative_numbers = true)]
    compression_level: i32,
}

fn main() {
    logging::init("info,profilestore=debug");

    let args = Args::parse();

    let config = Config::builder()
        .source_path(&args.source)
        .db_path(&args.db)
        .overwrite(args.force)
        .compression_level(args.compression_level)
        .build();

    let report = match Loader::from_config(&config).run() {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Load failed: {}", e);
            std::process::exit(1);
        }
    };

    println!("Parquet file size: {:.2} MB", report.source_megabytes());
    println!("Database file size: {:.2} MB", report.database_megabytes());
    if !report.compressed_columns.is_empty() {
        println!(
            "Compressed columns {}: {:.1}% of original size",
            report.compressed_columns.join(", "),
            report.compression_ratio() * 100.0
        );
    }
    println!(
        "Database created at {} with {} rows and indexes on Fid and Location",
        config.db_path.display(),
        report.rows
    );
}

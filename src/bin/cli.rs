//! profilestore CLI
//!
//! Exports profiles to CSV by identifier, by exact location, or unfiltered.
//! The one-line summary goes to stdout; logs go to stderr.

use std::path::PathBuf;

use clap::Parser;
use profilestore::config::{DEFAULT_DB_PATH, DEFAULT_EXPORT_LIMIT};
use profilestore::{logging, Config, ExportFilter, Exporter};

/// profilestore CLI
#[derive(Parser, Debug)]
#[command(name = "profilestore-cli")]
#[command(about = "Query user profiles and export them to CSV")]
#[command(version)]
#[command(arg_required_else_help = true)]
struct Args {
    /// FID to look up
    #[arg(long, conflicts_with = "location")]
    fid: Option<String>,

    /// Location to filter by (exact match)
    #[arg(long)]
    location: Option<String>,

    /// Output CSV file path
    #[arg(long)]
    outfile: PathBuf,

    /// Database file produced by profilestore-load
    #[arg(long, default_value = DEFAULT_DB_PATH)]
    db: PathBuf,

    /// Row cap when neither --fid nor --location is given
    #[arg(long, default_value_t = DEFAULT_EXPORT_LIMIT)]
    limit: usize,
}

fn main() {
    logging::init("warn");

    let args = Args::parse();
    let config = Config::builder()
        .db_path(&args.db)
        .export_limit(args.limit)
        .build();

    let result = ExportFilter::from_options(args.fid, args.location, config.export_limit)
        .and_then(|filter| {
            Exporter::open(&config.db_path)?.export(&filter, &args.outfile)
        });

    match result {
        Ok(summary) => println!("{}", summary.message()),
        Err(e) => {
            tracing::error!("Export failed: {}", e);
            std::process::exit(1);
        }
    }
}

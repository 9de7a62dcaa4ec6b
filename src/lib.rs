//! # profilestore
//!
//! Turns a Parquet file of user profiles into an indexed embedded database
//! and answers read-only lookups against it:
//! - Loader: Parquet → compressed `user_profiles` table with indexes on `Fid` and `Location`
//! - Query Service: lookup by identifier and by coordinates, over HTTP
//! - Export Tool: the same lookups from the command line, written as CSV
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────┐        ┌─────────────────────────────────────┐
//! │ Parquet file │───────▶│ Loader (offline, once)              │
//! └──────────────┘        └──────────────────┬──────────────────┘
//!                                            │ writes
//!                                            ▼
//!                          ┌───────────────────────────────────┐
//!                          │   user_profiles.db (SQLite file)  │
//!                          │   idx_fid, idx_location           │
//!                          └──────┬─────────────────────┬──────┘
//!                                 │ read-only           │ read-only
//!                                 ▼                     ▼
//!                   ┌───────────────────────┐  ┌─────────────────┐
//!                   │ Query Service (HTTP)  │  │ Export Tool     │
//!                   │ one store per request │  │ CSV             │
//!                   └───────────────────────┘  └─────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;
pub mod logging;

pub mod geo;
pub mod store;
pub mod loader;
pub mod query;
pub mod export;
pub mod protocol;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ErrorKind, ProfileError, Result};
pub use config::Config;
pub use geo::GeoPoint;
pub use store::{Cell, Profile, ProfileStore, ResultSet};
pub use loader::{LoadReport, Loader};
pub use query::QueryService;
pub use export::{ExportFilter, ExportSummary, Exporter};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of profilestore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Storage Module
//!
//! Read-only access to the database file produced by the loader.
//!
//! ## Layout
//! ```text
//! user_profiles            one row per profile, source columns unchanged
//!   ├── idx_fid            index on "Fid"
//!   └── idx_location       index on "Location"
//! ```
//!
//! Column types travel in the declared types (see `types`); text and blob
//! columns other than the two keys are compressed value by value (see
//! `codec`).
//!
//! Every `ProfileStore` owns one read-only connection. Callers open a
//! store per request and drop it when done; the engine's own multi-reader
//! locking is the only concurrency control.

pub mod codec;
mod record;
mod reader;
mod types;

pub use record::{Cell, Profile, ResultSet};
pub use reader::ProfileStore;
pub use types::{ColumnType, SqlType};

/// Table holding every profile
pub const TABLE_NAME: &str = "user_profiles";

/// Identifier column
pub const FID_COLUMN: &str = "Fid";

/// Geo-tagged column
pub const LOCATION_COLUMN: &str = "Location";

/// Index on the identifier column
pub const FID_INDEX: &str = "idx_fid";

/// Index on the location column
pub const LOCATION_INDEX: &str = "idx_location";

/// SQL function mapping a stored location to its canonical key
pub const GEO_KEY_FUNCTION: &str = "geo_key";

/// Whether `name` is one of the indexed key columns, which are never compressed
pub fn is_key_column(name: &str) -> bool {
    name.eq_ignore_ascii_case(FID_COLUMN) || name.eq_ignore_ascii_case(LOCATION_COLUMN)
}

/// Quote a column or table name for use in SQL
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

//! Column types
//!
//! The loader records each column's type in the declared type of the
//! `CREATE TABLE` statement; readers recover it from the statement's
//! column metadata.
//!
//! ```text
//! INTEGER  REAL  BOOLEAN  DECIMAL_TEXT  DATE  TIMESTAMP_{S,MS,US,NS}  TEXT  BLOB
//! TEXT_ZSTD  BLOB_ZSTD                  (values go through store::codec)
//! ```
//!
//! Every name keeps the SQLite affinity its values need: `DECIMAL_TEXT` has
//! TEXT affinity so digits are never re-parsed as floats, and the temporal
//! names have NUMERIC affinity so epoch integers stay integers.

use arrow::datatypes::{DataType, TimeUnit};

/// Suffix marking a column whose values are stored through the codec
pub const COMPRESSED_SUFFIX: &str = "_ZSTD";

/// Logical type of a stored column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Integer,
    Real,
    Boolean,
    /// Exact decimal digits, kept as text
    Decimal,
    /// Days since the Unix epoch
    Date,
    /// Ticks of the given unit since the Unix epoch, UTC
    Timestamp(TimeUnit),
    Text,
    Blob,
}

impl SqlType {
    /// Pick the stored type for an Arrow column
    pub fn for_arrow(data_type: &DataType) -> Self {
        match data_type {
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64 => SqlType::Integer,
            DataType::Float16 | DataType::Float32 | DataType::Float64 => SqlType::Real,
            DataType::Decimal128(_, _) | DataType::Decimal256(_, _) => SqlType::Decimal,
            DataType::Boolean => SqlType::Boolean,
            DataType::Date32 | DataType::Date64 => SqlType::Date,
            DataType::Timestamp(unit, _) => SqlType::Timestamp(*unit),
            DataType::Binary | DataType::LargeBinary => SqlType::Blob,
            // Strings, times of day, durations, intervals and nested types
            _ => SqlType::Text,
        }
    }

    /// Type name used in `CREATE TABLE`
    pub fn declared(&self) -> &'static str {
        match self {
            SqlType::Integer => "INTEGER",
            SqlType::Real => "REAL",
            SqlType::Boolean => "BOOLEAN",
            SqlType::Decimal => "DECIMAL_TEXT",
            SqlType::Date => "DATE",
            SqlType::Timestamp(TimeUnit::Second) => "TIMESTAMP_S",
            SqlType::Timestamp(TimeUnit::Millisecond) => "TIMESTAMP_MS",
            SqlType::Timestamp(TimeUnit::Microsecond) => "TIMESTAMP_US",
            SqlType::Timestamp(TimeUnit::Nanosecond) => "TIMESTAMP_NS",
            SqlType::Text => "TEXT",
            SqlType::Blob => "BLOB",
        }
    }

    fn from_declared(name: &str) -> Option<Self> {
        let ty = match name.to_ascii_uppercase().as_str() {
            "INTEGER" => SqlType::Integer,
            "REAL" => SqlType::Real,
            "BOOLEAN" => SqlType::Boolean,
            "DECIMAL_TEXT" => SqlType::Decimal,
            "DATE" => SqlType::Date,
            "TIMESTAMP_S" => SqlType::Timestamp(TimeUnit::Second),
            "TIMESTAMP_MS" => SqlType::Timestamp(TimeUnit::Millisecond),
            "TIMESTAMP_US" => SqlType::Timestamp(TimeUnit::Microsecond),
            "TIMESTAMP_NS" => SqlType::Timestamp(TimeUnit::Nanosecond),
            "TEXT" => SqlType::Text,
            "BLOB" => SqlType::Blob,
            _ => return None,
        };
        Some(ty)
    }

    /// Whether values of this type can go through the codec
    pub fn is_compressible(&self) -> bool {
        matches!(self, SqlType::Text | SqlType::Blob)
    }
}

/// Stored type of one column: logical type plus compression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnType {
    pub sql: SqlType,
    pub compressed: bool,
}

impl ColumnType {
    pub fn plain(sql: SqlType) -> Self {
        Self {
            sql,
            compressed: false,
        }
    }

    /// Compressed when the type allows it, plain otherwise
    pub fn compressed(sql: SqlType) -> Self {
        Self {
            sql,
            compressed: sql.is_compressible(),
        }
    }

    /// Type name used in `CREATE TABLE`
    pub fn declared(&self) -> String {
        if self.compressed {
            format!("{}{}", self.sql.declared(), COMPRESSED_SUFFIX)
        } else {
            self.sql.declared().to_string()
        }
    }

    /// Recover the type from a declared type name
    ///
    /// Unknown or missing names (tables not written by the loader,
    /// computed columns) read as plain text, which maps every stored
    /// value to its natural cell.
    pub fn from_declared(declared: Option<&str>) -> Self {
        let Some(declared) = declared.map(str::trim) else {
            return Self::plain(SqlType::Text);
        };

        let upper = declared.to_ascii_uppercase();
        let (base, compressed) = match upper.strip_suffix(COMPRESSED_SUFFIX) {
            Some(base) => (base, true),
            None => (upper.as_str(), false),
        };

        match SqlType::from_declared(base) {
            Some(sql) if compressed => Self::compressed(sql),
            Some(sql) => Self::plain(sql),
            None => Self::plain(SqlType::Text),
        }
    }
}

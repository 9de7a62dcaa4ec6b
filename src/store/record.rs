//! Record types
//!
//! Values read back from the database, independent of how they are
//! rendered (JSON for the HTTP API, CSV for exports).

use arrow::datatypes::TimeUnit;
use arrow::temporal_conversions::{
    date32_to_datetime, timestamp_ms_to_datetime, timestamp_ns_to_datetime,
    timestamp_s_to_datetime, timestamp_us_to_datetime,
};
use rusqlite::types::ValueRef;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::Result;

use super::codec;
use super::types::{ColumnType, SqlType};

/// A single stored column value
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Integer(i64),
    Real(f64),
    Boolean(bool),
    /// Exact decimal digits, e.g. `"1234.5600"`
    Decimal(String),
    /// Days since 1970-01-01
    Date(i32),
    /// Ticks since 1970-01-01T00:00:00 UTC
    Timestamp(i64, TimeUnit),
    Text(String),
    Blob(Vec<u8>),
}

impl Cell {
    /// Convert a raw SQLite value of a column declared as `column`
    ///
    /// Booleans come back from 0/1, temporals from epoch integers, and
    /// compressed values are unpacked. Anything the declared type does not
    /// account for maps to its natural cell.
    pub fn from_sql(value: ValueRef<'_>, column: &ColumnType) -> Result<Self> {
        let cell = match (column.sql, value) {
            (_, ValueRef::Null) => Cell::Null,
            (SqlType::Boolean, ValueRef::Integer(v)) => Cell::Boolean(v != 0),
            (SqlType::Date, ValueRef::Integer(v)) => match i32::try_from(v) {
                Ok(days) => Cell::Date(days),
                Err(_) => Cell::Integer(v),
            },
            (SqlType::Timestamp(unit), ValueRef::Integer(v)) => Cell::Timestamp(v, unit),
            (SqlType::Decimal, ValueRef::Text(bytes)) => {
                Cell::Decimal(String::from_utf8_lossy(bytes).into_owned())
            }
            (SqlType::Text, ValueRef::Blob(bytes)) if column.compressed => {
                Cell::Text(String::from_utf8_lossy(&codec::unpack(bytes)?).into_owned())
            }
            (SqlType::Blob, ValueRef::Blob(bytes)) if column.compressed => {
                Cell::Blob(codec::unpack(bytes)?)
            }
            (_, ValueRef::Integer(v)) => Cell::Integer(v),
            (_, ValueRef::Real(v)) => Cell::Real(v),
            (_, ValueRef::Text(bytes)) => Cell::Text(String::from_utf8_lossy(bytes).into_owned()),
            (_, ValueRef::Blob(bytes)) => Cell::Blob(bytes.to_vec()),
        };
        Ok(cell)
    }

    /// Text rendering for a CSV field (Null becomes an empty field)
    pub fn to_csv_field(&self) -> String {
        match self {
            Cell::Null => String::new(),
            Cell::Integer(v) => v.to_string(),
            Cell::Real(v) => v.to_string(),
            Cell::Boolean(v) => v.to_string(),
            Cell::Decimal(v) => v.clone(),
            Cell::Date(days) => format_date(*days),
            Cell::Timestamp(ticks, unit) => format_timestamp(*ticks, *unit),
            Cell::Text(v) => v.clone(),
            Cell::Blob(v) => to_hex(v),
        }
    }
}

/// ISO 8601 date, or the raw day count when out of range
fn format_date(days: i32) -> String {
    date32_to_datetime(days)
        .map(|dt| dt.date().to_string())
        .unwrap_or_else(|| days.to_string())
}

/// ISO 8601 timestamp without offset (values are UTC), fraction only when non-zero
fn format_timestamp(ticks: i64, unit: TimeUnit) -> String {
    let datetime = match unit {
        TimeUnit::Second => timestamp_s_to_datetime(ticks),
        TimeUnit::Millisecond => timestamp_ms_to_datetime(ticks),
        TimeUnit::Microsecond => timestamp_us_to_datetime(ticks),
        TimeUnit::Nanosecond => timestamp_ns_to_datetime(ticks),
    };
    datetime
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
        .unwrap_or_else(|| ticks.to_string())
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Cell::Null => serializer.serialize_none(),
            Cell::Integer(v) => serializer.serialize_i64(*v),
            Cell::Real(v) if v.is_finite() => serializer.serialize_f64(*v),
            Cell::Real(_) => serializer.serialize_none(),
            Cell::Boolean(v) => serializer.serialize_bool(*v),
            Cell::Decimal(v) => serializer.serialize_str(v),
            Cell::Date(days) => serializer.serialize_str(&format_date(*days)),
            Cell::Timestamp(ticks, unit) => serializer.serialize_str(&format_timestamp(*ticks, *unit)),
            Cell::Text(v) => serializer.serialize_str(v),
            Cell::Blob(v) => serializer.serialize_str(&to_hex(v)),
        }
    }
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// One profile: column name → value, in table column order
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    fields: Vec<(String, Cell)>,
}

impl Profile {
    pub fn new(fields: Vec<(String, Cell)>) -> Self {
        Self { fields }
    }

    /// Value of a column, if the column exists
    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, cell)| cell)
    }

    /// Column names in order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}

impl Serialize for Profile {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, cell) in &self.fields {
            map.serialize_entry(name, cell)?;
        }
        map.end()
    }
}

/// Rows returned by a query, with the statement's column names
///
/// Column names are known even when no row matched, so a header can
/// always be written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl ResultSet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Pair every row with the column names
    pub fn into_profiles(self) -> Vec<Profile> {
        let columns = self.columns;
        self.rows
            .into_iter()
            .map(|row| Profile::new(columns.iter().cloned().zip(row).collect()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_profile() -> Profile {
        Profile::new(vec![
            ("Fid".to_string(), Cell::Integer(977233)),
            ("Location".to_string(), Cell::Text("geo:34.05,-118.24".to_string())),
            ("Score".to_string(), Cell::Real(f64::NAN)),
            ("Active".to_string(), Cell::Boolean(true)),
            ("Bio".to_string(), Cell::Null),
            ("Avatar".to_string(), Cell::Blob(vec![0xde, 0xad])),
        ])
    }

    #[test]
    fn test_profile_json_keeps_column_order() {
        let json = serde_json::to_string(&sample_profile()).unwrap();
        assert_eq!(
            json,
            r#"{"Fid":977233,"Location":"geo:34.05,-118.24","Score":null,"Active":true,"Bio":null,"Avatar":"dead"}"#
        );
    }

    #[test]
    fn test_profile_get() {
        let profile = sample_profile();
        assert_eq!(profile.get("Fid"), Some(&Cell::Integer(977233)));
        assert_eq!(profile.get("Missing"), None);
        assert_eq!(profile.columns().count(), 6);
    }

    #[test]
    fn test_csv_fields() {
        assert_eq!(Cell::Null.to_csv_field(), "");
        assert_eq!(Cell::Integer(-5).to_csv_field(), "-5");
        assert_eq!(Cell::Real(2.5).to_csv_field(), "2.5");
        assert_eq!(Cell::Boolean(false).to_csv_field(), "false");
        assert_eq!(Cell::Blob(vec![1, 255]).to_csv_field(), "01ff");
    }

    fn read(value: ValueRef<'_>, declared: &str) -> Cell {
        Cell::from_sql(value, &ColumnType::from_declared(Some(declared))).unwrap()
    }

    #[test]
    fn test_from_sql_recovers_booleans() {
        assert_eq!(read(ValueRef::Integer(1), "BOOLEAN"), Cell::Boolean(true));
        assert_eq!(read(ValueRef::Integer(0), "BOOLEAN"), Cell::Boolean(false));
        assert_eq!(read(ValueRef::Integer(1), "INTEGER"), Cell::Integer(1));
        assert_eq!(read(ValueRef::Null, "BOOLEAN"), Cell::Null);
    }

    #[test]
    fn test_from_sql_recovers_temporals_and_decimals() {
        assert_eq!(read(ValueRef::Integer(19723), "DATE"), Cell::Date(19723));
        assert_eq!(
            read(ValueRef::Integer(1_704_067_200_123), "TIMESTAMP_MS"),
            Cell::Timestamp(1_704_067_200_123, TimeUnit::Millisecond)
        );
        assert_eq!(
            read(ValueRef::Text(b"12345678901234567.8901"), "DECIMAL_TEXT"),
            Cell::Decimal("12345678901234567.8901".to_string())
        );
    }

    #[test]
    fn test_from_sql_unpacks_compressed_values() {
        let text = "a fairly long biography that repeats itself ".repeat(10);
        let packed = codec::compress(text.as_bytes(), 3).unwrap().unwrap();

        assert_eq!(read(ValueRef::Blob(&packed), "TEXT_ZSTD"), Cell::Text(text));
        assert_eq!(read(ValueRef::Text(b"short"), "TEXT_ZSTD"), Cell::Text("short".into()));
        assert_eq!(
            read(ValueRef::Blob(&[codec::FLAG_RAW, 7]), "BLOB_ZSTD"),
            Cell::Blob(vec![7])
        );
        assert!(Cell::from_sql(
            ValueRef::Blob(&[42]),
            &ColumnType::from_declared(Some("BLOB_ZSTD"))
        )
        .is_err());
    }

    #[test]
    fn test_temporal_rendering() {
        assert_eq!(Cell::Date(19723).to_csv_field(), "2024-01-01");
        assert_eq!(
            Cell::Timestamp(1_704_067_200, TimeUnit::Second).to_csv_field(),
            "2024-01-01T00:00:00"
        );
        assert_eq!(
            Cell::Timestamp(1_704_067_200_123, TimeUnit::Millisecond).to_csv_field(),
            "2024-01-01T00:00:00.123"
        );
        let json = serde_json::to_string(&Cell::Date(0)).unwrap();
        assert_eq!(json, r#""1970-01-01""#);
    }

    #[test]
    fn test_into_profiles_pairs_columns() {
        let set = ResultSet::new(
            vec!["a".to_string(), "b".to_string()],
            vec![vec![Cell::Integer(1), Cell::Null], vec![Cell::Integer(2), Cell::Null]],
        );
        let profiles = set.into_profiles();
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[1].get("a"), Some(&Cell::Integer(2)));
        assert_eq!(profiles[0].columns().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}

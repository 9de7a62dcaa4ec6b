//! Profile Store
//!
//! Point lookups and bounded scans over `user_profiles`.

use std::path::{Path, PathBuf};

use rusqlite::functions::FunctionFlags;
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OpenFlags, Params};

use crate::error::{ProfileError, Result};
use crate::geo::{self, GeoPoint, GEO_SCHEME};

use super::{
    quote_ident, Cell, ColumnType, Profile, ResultSet, FID_COLUMN, GEO_KEY_FUNCTION,
    LOCATION_COLUMN, TABLE_NAME,
};

/// Read-only handle on a profile database
pub struct ProfileStore {
    /// Read-only connection, closed on drop
    conn: Connection,

    /// Path of the database file, for logging
    path: PathBuf,
}

impl ProfileStore {
    /// Open the database file read-only
    ///
    /// Fails with `DatabaseMissing` when the file does not exist, rather
    /// than letting the engine create an empty one.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ProfileError::DatabaseMissing(path.to_path_buf()));
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        register_geo_key(&conn)?;

        tracing::trace!("Opened read-only store at {}", path.display());

        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    /// Table column names, in order
    pub fn columns(&self) -> Result<Vec<String>> {
        let stmt = self
            .conn
            .prepare(&format!("SELECT * FROM {} LIMIT 0", TABLE_NAME))?;
        Ok(stmt.column_names().into_iter().map(String::from).collect())
    }

    /// Total number of stored profiles
    pub fn row_count(&self) -> Result<u64> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", TABLE_NAME),
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// Look up one profile by identifier
    ///
    /// When the identifier is not unique the first row returned by the
    /// engine wins, and a warning is logged.
    pub fn find_by_fid(&self, fid: &str) -> Result<Option<Profile>> {
        let sql = format!(
            "SELECT * FROM {} WHERE {} = ?1 LIMIT 2",
            TABLE_NAME,
            quote_ident(FID_COLUMN)
        );
        let set = self.select(&sql, params![fid])?;
        if set.len() > 1 {
            tracing::warn!(
                "Fid {} is not unique in {}; returning the first row",
                fid,
                self.path.display()
            );
        }
        Ok(set.into_profiles().into_iter().next())
    }

    /// Every row with the given identifier
    pub fn select_by_fid(&self, fid: &str) -> Result<ResultSet> {
        let sql = format!(
            "SELECT * FROM {} WHERE {} = ?1",
            TABLE_NAME,
            quote_ident(FID_COLUMN)
        );
        self.select(&sql, params![fid])
    }

    /// Every row whose location string equals `location` exactly
    pub fn select_by_location(&self, location: &str) -> Result<ResultSet> {
        let sql = format!(
            "SELECT * FROM {} WHERE {} = ?1",
            TABLE_NAME,
            quote_ident(LOCATION_COLUMN)
        );
        self.select(&sql, params![location])
    }

    /// Every profile at `point`
    ///
    /// Search order:
    /// 1. Exact match on the canonical form (uses `idx_location`)
    /// 2. Full-table scan matching each `geo:` location on its canonical
    ///    key; `LIKE` is case-insensitive, so `idx_location` is not used
    pub fn find_by_location(&self, point: &GeoPoint) -> Result<Vec<Profile>> {
        let canonical = point.canonical();

        let exact = self.select_by_location(&canonical)?;
        if !exact.is_empty() {
            return Ok(exact.into_profiles());
        }

        tracing::debug!("No exact match for {}, scanning stored locations", canonical);

        let location = quote_ident(LOCATION_COLUMN);
        let sql = format!(
            "SELECT * FROM {} WHERE {} LIKE '{}%' AND {}({}) = ?1",
            TABLE_NAME, location, GEO_SCHEME, GEO_KEY_FUNCTION, location
        );
        Ok(self.select(&sql, params![canonical])?.into_profiles())
    }

    /// Up to `limit` rows, unfiltered, in engine order
    pub fn select_all(&self, limit: usize) -> Result<ResultSet> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let sql = format!("SELECT * FROM {} LIMIT ?1", TABLE_NAME);
        self.select(&sql, params![limit])
    }

    /// Path of the underlying database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run a query and collect every row
    fn select<P: Params>(&self, sql: &str, params: P) -> Result<ResultSet> {
        let mut stmt = self.conn.prepare(sql)?;

        let column_types: Vec<ColumnType> = stmt
            .columns()
            .iter()
            .map(|column| ColumnType::from_declared(column.decl_type()))
            .collect();
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let mut rows = stmt.query(params)?;
        let mut collected = Vec::new();
        while let Some(row) = rows.next()? {
            let mut cells = Vec::with_capacity(column_types.len());
            for (idx, column) in column_types.iter().enumerate() {
                cells.push(Cell::from_sql(row.get_ref(idx)?, column)?);
            }
            collected.push(cells);
        }

        Ok(ResultSet::new(columns, collected))
    }
}

/// Register `geo_key(text)`, returning the canonical key or NULL
fn register_geo_key(conn: &Connection) -> Result<()> {
    conn.create_scalar_function(
        GEO_KEY_FUNCTION,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let key = match ctx.get_raw(0) {
                ValueRef::Text(bytes) => std::str::from_utf8(bytes)
                    .ok()
                    .and_then(geo::canonical_key),
                _ => None,
            };
            Ok(key)
        },
    )?;
    Ok(())
}

//! Loader Module
//!
//! Materializes a Parquet file into the profile database.
//!
//! ## Steps
//! 1. Read the Parquet schema and map every column to a stored type
//! 2. Create `user_profiles` in a temporary sibling file
//! 3. Insert every row inside one transaction, zstd-compressing the
//!    values of non-key text and blob columns
//! 4. Build `idx_fid` and `idx_location`
//! 5. Analyze and vacuum so the file holds no free pages
//! 6. Rename the temporary file over the target
//!
//! Any failure removes the temporary file, so the target is either the
//! complete new database or untouched.

mod columns;

pub use columns::ColumnValues;

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use arrow::datatypes::Schema;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};

use crate::config::{Config, DEFAULT_COMPRESSION_LEVEL};
use crate::error::{ProfileError, Result};
use crate::store::{
    codec, is_key_column, quote_ident, ColumnType, SqlType, FID_COLUMN, FID_INDEX,
    LOCATION_COLUMN, LOCATION_INDEX, TABLE_NAME,
};

/// Outcome of a successful load
#[derive(Debug, Clone)]
pub struct LoadReport {
    /// Rows written to `user_profiles`
    pub rows: u64,

    /// Column names, in source order
    pub columns: Vec<String>,

    /// Size of the Parquet file in bytes
    pub source_bytes: u64,

    /// Size of the finished database in bytes
    pub database_bytes: u64,

    /// Number of `Fid` values that occur more than once
    pub duplicate_fids: u64,

    /// Columns whose values are stored compressed
    pub compressed_columns: Vec<String>,

    /// Bytes of those values before compression
    pub payload_bytes: u64,

    /// Bytes of those values as stored
    pub stored_payload_bytes: u64,
}

impl LoadReport {
    pub fn source_megabytes(&self) -> f64 {
        megabytes(self.source_bytes)
    }

    pub fn database_megabytes(&self) -> f64 {
        megabytes(self.database_bytes)
    }

    /// Stored size of compressed column values relative to their raw size
    pub fn compression_ratio(&self) -> f64 {
        if self.payload_bytes == 0 {
            1.0
        } else {
            self.stored_payload_bytes as f64 / self.payload_bytes as f64
        }
    }
}

/// What `Loader::build` produced, before file sizes are known
struct Built {
    rows: u64,
    columns: Vec<String>,
    duplicate_fids: u64,
    compressed_columns: Vec<String>,
    payload_bytes: u64,
    stored_payload_bytes: u64,
}

fn megabytes(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

/// Builds a profile database from a Parquet file
pub struct Loader {
    source: PathBuf,
    target: PathBuf,
    overwrite: bool,
    compression_level: i32,
}

impl Loader {
    /// Suffix of the file the database is built in before the final rename
    const TEMP_SUFFIX: &'static str = "tmp";

    pub fn new(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            overwrite: false,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }

    /// Loader for the paths, overwrite flag and compression level in `config`
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.source_path, &config.db_path)
            .overwrite(config.overwrite)
            .compression_level(config.compression_level)
    }

    /// Replace an existing target instead of refusing
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// zstd level for compressed columns
    pub fn compression_level(mut self, level: i32) -> Self {
        self.compression_level = level;
        self
    }

    /// Path the database is built in before it is renamed into place
    pub fn temp_path(&self) -> PathBuf {
        let mut name = self
            .target
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".");
        name.push(Self::TEMP_SUFFIX);
        self.target.with_file_name(name)
    }

    /// Run the load
    pub fn run(&self) -> Result<LoadReport> {
        if !zstd::compression_level_range().contains(&self.compression_level) {
            return Err(ProfileError::Config(format!(
                "compression level {} is outside {:?}",
                self.compression_level,
                zstd::compression_level_range()
            )));
        }
        if !self.source.is_file() {
            return Err(ProfileError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Source file not found at {}", self.source.display()),
            )));
        }
        if self.target.exists() && !self.overwrite {
            return Err(ProfileError::AlreadyExists(self.target.clone()));
        }
        if let Some(parent) = self.target.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp_path = self.temp_path();
        if temp_path.exists() {
            tracing::warn!("Removing stale temporary file {}", temp_path.display());
            fs::remove_file(&temp_path)?;
        }

        tracing::info!(
            "Loading {} into {}",
            self.source.display(),
            self.target.display()
        );

        let built = match self.build(&temp_path) {
            Ok(built) => built,
            Err(e) => {
                if let Err(cleanup) = fs::remove_file(&temp_path) {
                    if cleanup.kind() != std::io::ErrorKind::NotFound {
                        tracing::warn!(
                            "Could not remove {}: {}",
                            temp_path.display(),
                            cleanup
                        );
                    }
                }
                return Err(e);
            }
        };

        // rename replaces an existing target in one step
        if let Err(e) = fs::rename(&temp_path, &self.target) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        let report = LoadReport {
            rows: built.rows,
            columns: built.columns,
            source_bytes: fs::metadata(&self.source)?.len(),
            database_bytes: fs::metadata(&self.target)?.len(),
            duplicate_fids: built.duplicate_fids,
            compressed_columns: built.compressed_columns,
            payload_bytes: built.payload_bytes,
            stored_payload_bytes: built.stored_payload_bytes,
        };

        if report.duplicate_fids > 0 {
            tracing::warn!(
                "{} Fid values occur more than once; lookups return the first match",
                report.duplicate_fids
            );
        }
        if !report.compressed_columns.is_empty() {
            tracing::info!(
                "Compressed {:?}: {} -> {} bytes ({:.1}%)",
                report.compressed_columns,
                report.payload_bytes,
                report.stored_payload_bytes,
                report.compression_ratio() * 100.0
            );
        }
        tracing::info!(
            "Loaded {} rows ({} columns): {:.2} MB parquet -> {:.2} MB database",
            report.rows,
            report.columns.len(),
            report.source_megabytes(),
            report.database_megabytes()
        );

        Ok(report)
    }

    /// Build the complete database at `path`
    fn build(&self, path: &Path) -> Result<Built> {
        let builder = ParquetRecordBatchReaderBuilder::try_new(File::open(&self.source)?)?;
        let schema = builder.schema().clone();
        let expected_rows = builder.metadata().file_metadata().num_rows();
        let reader = builder.build()?;

        require_column(&schema, FID_COLUMN)?;
        require_column(&schema, LOCATION_COLUMN)?;

        let columns: Vec<String> = schema.fields().iter().map(|f| f.name().clone()).collect();
        let column_types: Vec<ColumnType> = schema
            .fields()
            .iter()
            .map(|f| {
                let sql = SqlType::for_arrow(f.data_type());
                if is_key_column(f.name()) {
                    ColumnType::plain(sql)
                } else {
                    ColumnType::compressed(sql)
                }
            })
            .collect();
        let compressed_columns: Vec<String> = columns
            .iter()
            .zip(&column_types)
            .filter(|(_, ty)| ty.compressed)
            .map(|(name, _)| name.clone())
            .collect();
        let column_defs = columns
            .iter()
            .zip(&column_types)
            .map(|(name, ty)| format!("{} {}", quote_ident(name), ty.declared()))
            .collect::<Vec<_>>()
            .join(", ");

        let mut conn = Connection::open(path)?;
        // Durability comes from the final rename, not from the journal
        conn.pragma_update_and_check(None, "journal_mode", "OFF", |row| row.get::<_, String>(0))?;
        conn.pragma_update(None, "synchronous", "OFF")?;

        conn.execute_batch(&format!("CREATE TABLE {} ({});", TABLE_NAME, column_defs))?;

        let placeholders = (1..=columns.len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");
        let insert = format!("INSERT INTO {} VALUES ({})", TABLE_NAME, placeholders);

        let mut rows: u64 = 0;
        let mut payload_bytes: u64 = 0;
        let mut stored_payload_bytes: u64 = 0;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(&insert)?;
            let mut values = Vec::with_capacity(columns.len());

            for batch in reader {
                let batch = batch?;
                let batch_columns = batch
                    .columns()
                    .iter()
                    .map(ColumnValues::from_array)
                    .collect::<Result<Vec<_>>>()?;

                for row in 0..batch.num_rows() {
                    values.clear();
                    for (column, ty) in batch_columns.iter().zip(&column_types) {
                        let value = column.value(row)?;
                        if !ty.compressed {
                            values.push(value);
                            continue;
                        }
                        payload_bytes += value_len(&value);
                        let stored = codec::encode(value, ty, self.compression_level)?;
                        stored_payload_bytes += value_len(&stored);
                        values.push(stored);
                    }
                    stmt.execute(params_from_iter(values.iter()))?;
                    rows += 1;
                }

                tracing::debug!("Inserted batch of {} rows ({} total)", batch.num_rows(), rows);
            }
        }
        tx.commit()?;

        if i64::try_from(rows).ok() != Some(expected_rows) {
            return Err(ProfileError::Schema(format!(
                "Row count mismatch: parquet metadata reports {}, loaded {}",
                expected_rows, rows
            )));
        }

        conn.execute_batch(&format!(
            "CREATE INDEX {} ON {}({});
             CREATE INDEX {} ON {}({});",
            FID_INDEX,
            TABLE_NAME,
            quote_ident(FID_COLUMN),
            LOCATION_INDEX,
            TABLE_NAME,
            quote_ident(LOCATION_COLUMN)
        ))?;
        tracing::debug!("Created indexes {} and {}", FID_INDEX, LOCATION_INDEX);

        let duplicate_fids: i64 = conn.query_row(
            &format!(
                "SELECT COUNT(*) FROM (SELECT {fid} FROM {table} WHERE {fid} IS NOT NULL \
                 GROUP BY {fid} HAVING COUNT(*) > 1)",
                fid = quote_ident(FID_COLUMN),
                table = TABLE_NAME
            ),
            [],
            |row| row.get(0),
        )?;

        conn.execute_batch("ANALYZE; VACUUM;")?;
        conn.close().map_err(|(_, e)| e)?;

        Ok(Built {
            rows,
            columns,
            duplicate_fids: duplicate_fids as u64,
            compressed_columns,
            payload_bytes,
            stored_payload_bytes,
        })
    }
}

/// Payload size of a text or blob value
fn value_len(value: &Value) -> u64 {
    match value {
        Value::Text(text) => text.len() as u64,
        Value::Blob(bytes) => bytes.len() as u64,
        _ => 0,
    }
}

/// Fail unless the schema has `name` (SQLite identifiers ignore ASCII case)
fn require_column(schema: &Schema, name: &str) -> Result<()> {
    if schema
        .fields()
        .iter()
        .any(|f| f.name().eq_ignore_ascii_case(name))
    {
        Ok(())
    } else {
        Err(ProfileError::Schema(format!(
            "Source file has no '{}' column",
            name
        )))
    }
}

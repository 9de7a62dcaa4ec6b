//! Export Module
//!
//! Runs at most one lookup against the store and writes the result set as
//! CSV: a header row with the table's column names, then the rows in the
//! order the engine returned them.

use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{ProfileError, Result};
use crate::store::{ProfileStore, ResultSet};

/// Which rows to export
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportFilter {
    /// Every row with this identifier
    Fid(String),

    /// Every row whose location equals this string exactly (no fallback)
    Location(String),

    /// Unfiltered, capped at `limit` rows
    All { limit: usize },
}

impl ExportFilter {
    /// Build a filter from optional command-line values
    ///
    /// Empty strings count as absent. Giving both is rejected.
    pub fn from_options(
        fid: Option<String>,
        location: Option<String>,
        limit: usize,
    ) -> Result<Self> {
        let fid = fid.filter(|s| !s.is_empty());
        let location = location.filter(|s| !s.is_empty());

        match (fid, location) {
            (Some(_), Some(_)) => Err(ProfileError::InvalidInput(
                "--fid and --location are mutually exclusive".to_string(),
            )),
            (Some(fid), None) => Ok(ExportFilter::Fid(fid)),
            (None, Some(location)) => Ok(ExportFilter::Location(location)),
            (None, None) => Ok(ExportFilter::All { limit }),
        }
    }
}

impl fmt::Display for ExportFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFilter::Fid(fid) => write!(f, "FID {}", fid),
            ExportFilter::Location(location) => write!(f, "location {}", location),
            ExportFilter::All { limit } => write!(f, "all profiles (max {})", limit),
        }
    }
}

/// What an export wrote
#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub filter: ExportFilter,
    pub rows: usize,
    pub outfile: PathBuf,
}

impl ExportSummary {
    /// One-line human readable summary
    pub fn message(&self) -> String {
        if self.rows == 0 {
            format!(
                "No profiles found for {}; wrote header only to {}",
                self.filter,
                self.outfile.display()
            )
        } else {
            format!(
                "Exported {} profiles for {} to {}",
                self.rows,
                self.filter,
                self.outfile.display()
            )
        }
    }
}

/// Export tool over one read-only store
pub struct Exporter {
    store: ProfileStore,
}

impl Exporter {
    /// Open the database read-only
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            store: ProfileStore::open(db_path)?,
        })
    }

    /// Run the single query `filter` selects
    pub fn query(&self, filter: &ExportFilter) -> Result<ResultSet> {
        match filter {
            ExportFilter::Fid(fid) => self.store.select_by_fid(fid),
            ExportFilter::Location(location) => self.store.select_by_location(location),
            ExportFilter::All { limit } => self.store.select_all(*limit),
        }
    }

    /// Query and write the CSV file at `outfile`
    pub fn export(&self, filter: &ExportFilter, outfile: impl AsRef<Path>) -> Result<ExportSummary> {
        let outfile = outfile.as_ref();
        let set = self.query(filter)?;

        write_csv(&set, File::create(outfile)?)?;

        tracing::debug!("Wrote {} rows to {}", set.len(), outfile.display());

        Ok(ExportSummary {
            filter: filter.clone(),
            rows: set.len(),
            outfile: outfile.to_path_buf(),
        })
    }
}

/// Write `set` as CSV, header first
pub fn write_csv<W: Write>(set: &ResultSet, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(&set.columns)?;
    for row in &set.rows {
        csv.write_record(row.iter().map(|cell| cell.to_csv_field()))?;
    }
    csv.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Cell;

    #[test]
    fn test_filter_from_options() {
        assert_eq!(
            ExportFilter::from_options(Some("42".into()), None, 10).unwrap(),
            ExportFilter::Fid("42".into())
        );
        assert_eq!(
            ExportFilter::from_options(None, Some("geo:1.00,2.00".into()), 10).unwrap(),
            ExportFilter::Location("geo:1.00,2.00".into())
        );
        assert_eq!(
            ExportFilter::from_options(Some(String::new()), None, 10).unwrap(),
            ExportFilter::All { limit: 10 }
        );
        assert!(ExportFilter::from_options(Some("1".into()), Some("x".into()), 10).is_err());
    }

    #[test]
    fn test_write_csv_quotes_and_nulls() {
        let set = ResultSet::new(
            vec!["Fid".into(), "Location".into(), "Bio".into()],
            vec![vec![
                Cell::Integer(1),
                Cell::Text("geo:34.05,-118.24".into()),
                Cell::Null,
            ]],
        );
        let mut out = Vec::new();
        write_csv(&set, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Fid,Location,Bio\n1,\"geo:34.05,-118.24\",\n"
        );
    }

    #[test]
    fn test_write_csv_header_only() {
        let set = ResultSet::new(vec!["Fid".into(), "Location".into()], Vec::new());
        let mut out = Vec::new();
        write_csv(&set, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Fid,Location\n");
    }

    #[test]
    fn test_summary_message() {
        let summary = ExportSummary {
            filter: ExportFilter::All { limit: 10000 },
            rows: 3,
            outfile: PathBuf::from("out.csv"),
        };
        assert_eq!(
            summary.message(),
            "Exported 3 profiles for all profiles (max 10000) to out.csv"
        );
    }
}

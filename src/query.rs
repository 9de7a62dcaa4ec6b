//! Query Service
//!
//! The two read operations behind the HTTP API, independent of any
//! transport. Every call opens its own read-only store and drops it
//! before returning; nothing is shared between calls.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{ProfileError, Result};
use crate::geo::GeoPoint;
use crate::store::{Profile, ProfileStore};

/// Message returned when either coordinate is absent or empty
pub const MISSING_COORDINATES: &str = "Missing 'lat' or 'lon' parameters";

/// Stateless lookup service over one database file
#[derive(Debug, Clone)]
pub struct QueryService {
    db_path: PathBuf,
}

impl QueryService {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.db_path)
    }

    /// Database file every call opens
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Profile with the given identifier
    ///
    /// Returns `NotFound` when no row matches.
    pub fn by_fid(&self, fid: &str) -> Result<Profile> {
        let store = ProfileStore::open(&self.db_path)?;
        store
            .find_by_fid(fid)?
            .ok_or_else(|| ProfileError::NotFound(format!("No profile found with FID: {}", fid)))
    }

    /// Profiles at the given coordinates, as received from a caller
    ///
    /// Missing, empty, non-numeric or non-finite input is `InvalidInput`;
    /// no match after the fallback scan is `NotFound`.
    pub fn by_location(&self, lat: Option<&str>, lon: Option<&str>) -> Result<Vec<Profile>> {
        let (lat, lon) = match (non_empty(lat), non_empty(lon)) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => return Err(ProfileError::InvalidInput(MISSING_COORDINATES.to_string())),
        };

        let point = GeoPoint::from_query(lat, lon)?;
        self.by_point(&point)
    }

    /// Profiles at an already parsed point
    pub fn by_point(&self, point: &GeoPoint) -> Result<Vec<Profile>> {
        let store = ProfileStore::open(&self.db_path)?;
        let profiles = store.find_by_location(point)?;

        if profiles.is_empty() {
            return Err(ProfileError::NotFound(format!(
                "No profiles found with location near lat:{}, lon:{}",
                point.formatted_lat(),
                point.formatted_lon()
            )));
        }

        tracing::debug!("{} profiles at {}", profiles.len(), point);
        Ok(profiles)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

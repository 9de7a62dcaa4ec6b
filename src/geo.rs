//! Location Grammar
//!
//! Stored profiles carry a textual location such as `geo:34.05,-118.24`.
//! This module parses that text into numbers once, and defines equality as
//! "both coordinates format to the same two-decimal string".
//!
//! ## Grammar
//! ```text
//! location = "geo:" lat "," lon [ "," alt ] *( ";" param )
//! ```
//! The scheme is ASCII case-insensitive, whitespace around numbers is
//! ignored, and altitude and parameters do not take part in equality.

use std::fmt;
use std::str::FromStr;

use crate::error::{ProfileError, Result};

/// URI scheme prefix of every stored location
pub const GEO_SCHEME: &str = "geo:";

/// Message returned for coordinates that are not finite decimal numbers
pub const INVALID_COORDINATES: &str = "Invalid lat/lon format. Please provide numeric values.";

/// A latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Create a point, rejecting NaN and infinities
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(ProfileError::InvalidInput(INVALID_COORDINATES.to_string()));
        }
        Ok(Self { lat, lon })
    }

    /// Build a point from two decimal strings, as received in a query string
    pub fn from_query(lat: &str, lon: &str) -> Result<Self> {
        let invalid = || ProfileError::InvalidInput(INVALID_COORDINATES.to_string());
        let lat = lat.trim().parse::<f64>().map_err(|_| invalid())?;
        let lon = lon.trim().parse::<f64>().map_err(|_| invalid())?;
        Self::new(lat, lon)
    }

    /// Parse a stored location string
    pub fn parse(input: &str) -> Result<Self> {
        let malformed = || ProfileError::InvalidInput(format!("Malformed location: {}", input));

        let trimmed = input.trim();
        let rest = trimmed
            .get(..GEO_SCHEME.len())
            .filter(|scheme| scheme.eq_ignore_ascii_case(GEO_SCHEME))
            .map(|_| &trimmed[GEO_SCHEME.len()..])
            .ok_or_else(malformed)?;

        let coords = match rest.split_once(';') {
            Some((coords, _params)) => coords,
            None => rest,
        };

        let mut parts = coords.split(',');
        let lat = parts.next().ok_or_else(malformed)?;
        let lon = parts.next().ok_or_else(malformed)?;
        if let Some(alt) = parts.next() {
            alt.trim().parse::<f64>().map_err(|_| malformed())?;
        }
        if parts.next().is_some() {
            return Err(malformed());
        }

        let lat = lat.trim().parse::<f64>().map_err(|_| malformed())?;
        let lon = lon.trim().parse::<f64>().map_err(|_| malformed())?;
        Self::new(lat, lon).map_err(|_| malformed())
    }

    /// Latitude at two-decimal precision
    pub fn formatted_lat(&self) -> String {
        two_decimals(self.lat)
    }

    /// Longitude at two-decimal precision
    pub fn formatted_lon(&self) -> String {
        two_decimals(self.lon)
    }

    /// Canonical stored form, `geo:<lat>,<lon>` at two decimals
    pub fn canonical(&self) -> String {
        format!("{}{},{}", GEO_SCHEME, self.formatted_lat(), self.formatted_lon())
    }
}

impl FromStr for GeoPoint {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

/// `{:.2}` with negative zero folded into zero
///
/// Values in (-0.005, 0) round to `-0.00`, which must compare equal to `0.00`.
fn two_decimals(value: f64) -> String {
    let formatted = format!("{:.2}", value);
    if formatted == "-0.00" {
        "0.00".to_string()
    } else {
        formatted
    }
}

/// Canonical key for a stored location, or None when it does not parse
pub fn canonical_key(raw: &str) -> Option<String> {
    GeoPoint::parse(raw).ok().map(|point| point.canonical())
}

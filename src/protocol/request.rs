//! Request definitions

use serde::Deserialize;

/// Query string of `GET /location`
///
/// Both fields stay strings so that a missing value and a non-numeric
/// value can be reported differently.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationParams {
    pub lat: Option<String>,
    pub lon: Option<String>,
}

//! Request Handlers
//!
//! Thin wrappers that move each lookup onto the blocking pool and map its
//! result onto a response. Extractor rejections become `InvalidInput`, so
//! every failure carries the same JSON body.

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;

use crate::error::{ProfileError, Result};
use crate::protocol::{api_info, ApiError, ApiInfo, LocationParams};
use crate::query::QueryService;
use crate::store::Profile;

/// `GET /`
pub async fn index() -> Json<ApiInfo> {
    Json(api_info())
}

/// `GET /fid/{fid}`
pub async fn by_fid(
    State(service): State<QueryService>,
    fid: std::result::Result<Path<String>, PathRejection>,
) -> std::result::Result<Json<Profile>, ApiError> {
    let Path(fid) = fid.map_err(|e| ProfileError::InvalidInput(e.body_text()))?;
    tracing::debug!("Lookup by fid {}", fid);
    let profile = run_blocking(move || service.by_fid(&fid)).await?;
    Ok(Json(profile))
}

/// `GET /location?lat=..&lon=..`
pub async fn by_location(
    State(service): State<QueryService>,
    params: std::result::Result<Query<LocationParams>, QueryRejection>,
) -> std::result::Result<Json<Vec<Profile>>, ApiError> {
    let Query(params) = params.map_err(|e| ProfileError::InvalidInput(e.body_text()))?;
    tracing::debug!("Lookup by location lat={:?} lon={:?}", params.lat, params.lon);
    let profiles = run_blocking(move || {
        service.by_location(params.lat.as_deref(), params.lon.as_deref())
    })
    .await?;
    Ok(Json(profiles))
}

/// Any other path
pub async fn not_found() -> ApiError {
    ApiError(ProfileError::NotFound("Not found".to_string()))
}

/// Run a blocking lookup off the async workers
async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ProfileError::Task(e.to_string()))?
}

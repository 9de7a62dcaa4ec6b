//! Response definitions
//!
//! Maps the error taxonomy onto HTTP status codes and JSON bodies.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::{ErrorKind, ProfileError};

/// JSON body of every failed request
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Status code for an error kind
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::ClientInput => StatusCode::BAD_REQUEST,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// A failed request
#[derive(Debug)]
pub struct ApiError(pub ProfileError);

impl From<ProfileError> for ApiError {
    fn from(err: ProfileError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(self.0.kind());
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.0);
        } else {
            tracing::debug!("Request rejected ({}): {}", status, self.0);
        }

        let body = ErrorBody {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Body of `GET /`
#[derive(Debug, Clone, Serialize)]
pub struct ApiInfo {
    pub name: &'static str,
    pub endpoints: Vec<EndpointInfo>,
    pub examples: Vec<ExampleInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EndpointInfo {
    pub path: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<&'static str>,
    pub description: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExampleInfo {
    pub url: &'static str,
    pub description: &'static str,
}

/// Description of the API served at `/`
pub fn api_info() -> ApiInfo {
    ApiInfo {
        name: "User Profiles API",
        endpoints: vec![
            EndpointInfo {
                path: "/fid/<fid>",
                params: Vec::new(),
                description: "Get profile by FID",
            },
            EndpointInfo {
                path: "/location",
                params: vec!["lat", "lon"],
                description: "Get profiles by location coordinates",
            },
        ],
        examples: vec![
            ExampleInfo {
                url: "/fid/977233",
                description: "Get profile with FID 977233",
            },
            ExampleInfo {
                url: "/location?lat=34.05&lon=-118.24",
                description: "Get profiles near Los Angeles",
            },
        ],
    }
}

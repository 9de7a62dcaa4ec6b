//! Protocol Module
//!
//! Shapes of the HTTP API's requests and responses.
//!
//! ## Endpoints
//! - `GET /`                       API description
//! - `GET /fid/{fid}`              one profile object
//! - `GET /location?lat=..&lon=..` array of profile objects
//!
//! ## Status Codes
//! - 200: OK
//! - 400: missing or non-numeric parameters
//! - 404: nothing matched
//! - 500: anything else
//!
//! Every failure carries a body of the form `{"error": "<message>"}`.

mod request;
mod response;

pub use request::LocationParams;
pub use response::{api_info, status_for, ApiError, ApiInfo, EndpointInfo, ErrorBody, ExampleInfo};

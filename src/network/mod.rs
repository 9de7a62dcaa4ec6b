//! Network Module
//!
//! HTTP server for the Query Service.
//!
//! ## Architecture
//! - axum router on a multi-threaded tokio runtime
//! - Each lookup runs on the blocking pool with its own read-only store
//! - No state shared between requests beyond the database path

mod server;
mod handlers;

pub use server::{router, Server};

//! Dashboard error types

use thiserror::Error;

/// Errors that can occur while fetching or decoding bot API snapshots
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Request to {endpoint} failed: {source}")]
    Request {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned HTTP {status}")]
    Status {
        endpoint: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("Failed to decode {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

/// Result type for dashboard operations
pub type DashboardResult<T> = std::result::Result<T, DashboardError>;

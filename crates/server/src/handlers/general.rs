//! # General Route Handlers
//!
//! The root and health check endpoints.

/// The handler for the root (`/`) endpoint.
pub async fn root() -> &'static str {
    "rfpnav server is running."
}

/// The handler for the health check (`/health`) endpoint.
pub async fn health_check() -> &'static str {
    "OK"
}

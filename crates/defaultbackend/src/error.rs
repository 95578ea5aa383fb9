//! Unified error type for the default backend.

use std::net::SocketAddr;

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, ServerError>;

/// Errors that terminate the process.
///
/// Individual requests cannot fail by design, so everything here is
/// lifecycle-level: either the listener never came up, or the accept loop
/// died underneath us.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("server failed: {0}")]
    Serve(#[source] std::io::Error),
}

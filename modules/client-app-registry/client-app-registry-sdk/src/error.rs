//! Error types for the client application registry SDK.

use std::fmt;

/// Errors raised by a [`ClientAppCatalog`](crate::api::ClientAppCatalog)
/// implementation.
///
/// Absence of a record is not an error: lookups return `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// Network connection to the catalog failed.
    #[error("connection error: {0}")]
    Connection(String),

    /// Request exceeded the configured transport timeout.
    #[error("timeout: {0}")]
    Timeout(String),

    /// Catalog answered with an unexpected status code.
    #[error("HTTP error: {status}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Response body (may contain error details)
        body: String,
    },

    /// Response body could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Catalog served a record whose protocol tag this registry does not
    /// support. Catalog and registry are deployed in lockstep, so this is a
    /// deployment contract violation rather than a transient condition.
    #[error("unsupported protocol tag '{tag}' in client app record")]
    UnsupportedProtocol {
        /// Raw tag found in the record
        tag: String,
    },

    /// Any other transport failure.
    #[error("transport error: {0}")]
    Transport(String),
}

impl CatalogError {
    /// Check if error is a connection error
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Check if error is a timeout
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Get HTTP status code if this is an HTTP error
    #[must_use]
    pub const fn http_status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if error is retryable
    ///
    /// Returns true for transient errors like connection failures and timeouts,
    /// but false for errors that won't succeed on retry. The registry itself
    /// never retries; this is for callers running their own polling loop.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Connection(_) | Self::Timeout(_) => true,
            Self::Http { status, .. } => *status >= 500 || *status == 429,
            Self::InvalidResponse(_) | Self::UnsupportedProtocol { .. } | Self::Transport(_) => {
                false
            }
        }
    }
}

/// Mutation attempted against the read-only registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOperation {
    Save,
    Delete,
}

impl fmt::Display for WriteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Save => f.write_str("saving"),
            Self::Delete => f.write_str("deleting"),
        }
    }
}

/// Errors returned by a [`ServiceRegistry`](crate::api::ServiceRegistry).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The registry is read-only; the remote catalog is the sole source of
    /// truth for writes.
    #[error("{operation} registered services is not supported: the registry is read-only")]
    UnsupportedOperation {
        /// Rejected operation
        operation: WriteOperation,
    },

    /// Remote catalog call failed. Propagated unchanged.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

impl RegistryError {
    #[must_use]
    pub const fn is_unsupported_operation(&self) -> bool {
        matches!(self, Self::UnsupportedOperation { .. })
    }
}

/// Protocol tag outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown protocol type '{0}'")]
pub struct UnknownProtocolType(pub String);

/// Capability descriptor outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown capability '{0}'")]
pub struct UnknownCapability(pub String);

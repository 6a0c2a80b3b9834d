//! Network service directory: models and the business-logic contract the
//! delegation shim forwards to.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Role of a network service instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NetworkServiceType {
    /// Identity-management core (the catalog owner).
    Master,
    /// Security reverse proxy.
    Sra,
    /// Web access (authentication gateway).
    Wa,
}

impl NetworkServiceType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Master => "MASTER",
            Self::Sra => "SRA",
            Self::Wa => "WA",
        }
    }
}

impl fmt::Display for NetworkServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkServiceType {
    type Err = NetworkServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "MASTER" => Ok(Self::Master),
            "SRA" => Ok(Self::Sra),
            "WA" => Ok(Self::Wa),
            _ => Err(NetworkServiceError::InvalidType(s.to_owned())),
        }
    }
}

/// One registered network service instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NetworkService {
    #[serde(rename = "type")]
    pub service_type: NetworkServiceType,
    pub address: String,
}

impl NetworkService {
    #[must_use]
    pub fn new(service_type: NetworkServiceType, address: impl Into<String>) -> Self {
        Self {
            service_type,
            address: address.into(),
        }
    }
}

/// Errors returned by network service directory operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkServiceError {
    #[error("invalid network service type: {0}")]
    InvalidType(String),
    /// A spawned registration task did not complete.
    #[error("registration task failed: {0}")]
    Join(String),
    #[error("internal: {0}")]
    Internal(String),
}

/// Business logic behind the network service directory.
#[async_trait]
pub trait NetworkServiceLogic: Send + Sync {
    /// All instances registered for `service_type`.
    ///
    /// # Errors
    /// Returns `NetworkServiceError` if the directory cannot be read.
    async fn list(
        &self,
        service_type: NetworkServiceType,
    ) -> Result<Vec<NetworkService>, NetworkServiceError>;

    /// One instance of `service_type`, if any is registered.
    ///
    /// # Errors
    /// Returns `NetworkServiceError` if the directory cannot be read.
    async fn get(
        &self,
        service_type: NetworkServiceType,
    ) -> Result<Option<NetworkService>, NetworkServiceError>;

    /// Add an instance. Registering an existing instance is a no-op.
    ///
    /// # Errors
    /// Returns `NetworkServiceError` if the directory cannot be written.
    async fn register(&self, service: NetworkService) -> Result<(), NetworkServiceError>;

    /// Remove an instance. Removing an unknown instance is a no-op.
    ///
    /// # Errors
    /// Returns `NetworkServiceError` if the directory cannot be written.
    async fn unregister(&self, service: NetworkService) -> Result<(), NetworkServiceError>;
}

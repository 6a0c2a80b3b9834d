//! Client App Registry Module
//!
//! Read-only registered-service registry for the authentication gateway,
//! backed by the remote client app catalog.
//!
//! - [`ServiceRegistryAdapter`] answers the gateway's registry lookups by
//!   fetching from a [`ClientAppCatalog`] and mapping each record with
//!   [`to_registered_service`]
//! - [`RemoteCatalogClient`] talks to the catalog over HTTP and flips a
//!   [`ReadinessGate`] once the catalog answers its health probe
//! - [`NetworkServiceDelegate`] fronts a network service directory, with
//!   [`InMemoryNetworkServiceLogic`] as the in-process store
//! - [`ClientAppRegistryModule`] wires the pieces from
//!   [`ClientAppRegistryConfig`]

#![forbid(unsafe_code)]

pub use client_app_registry_sdk::{
    Capability, CatalogError, ClientApp, ClientAppCatalog, NetworkService, NetworkServiceError,
    NetworkServiceLogic, NetworkServiceType, ProtocolType, RegisteredService, RegistryError,
    ServiceRegistry,
};

pub mod config;
pub mod domain;
pub mod infra;
pub mod logging;
pub mod module;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_support;

pub use config::{CatalogConfig, ClientAppRegistryConfig};
pub use domain::{
    NetworkServiceDelegate, ReadinessGate, ReadinessProbe, RegistrationHandle,
    ServiceRegistryAdapter, to_registered_service,
};
pub use infra::catalog::{BootstrapHandle, RemoteCatalogClient};
pub use infra::storage::InMemoryNetworkServiceLogic;
pub use logging::init_logging;
pub use module::ClientAppRegistryModule;

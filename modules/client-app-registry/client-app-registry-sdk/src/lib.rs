//! Client App Registry SDK
//!
//! This crate provides the public API for the `client_app_registry` module:
//!
//! - [`ServiceRegistry`] - Registry lookup contract consumed by the authentication gateway
//! - [`ClientAppCatalog`] - Contract of the remote catalog the registry fronts
//! - [`ClientApp`], [`RegisteredService`] - Catalog records and the services mapped from them
//! - [`ProtocolType`], [`Capability`] - Protocol tags and typed-lookup descriptors
//! - [`RegistryError`], [`CatalogError`] - Error types
//! - [`network`] - Network service directory models and logic contract
//!
//! ## Usage
//!
//! ```ignore
//! use client_app_registry_sdk::{Capability, ServiceRegistry};
//!
//! let services = registry.load().await?;
//! let rp = registry.find_by_id_as(42, Capability::OidcRelyingParty).await?;
//! ```

#![forbid(unsafe_code)]

pub mod api;
pub mod error;
pub mod models;
pub mod network;

pub use api::{ClientAppCatalog, ServiceRegistry};
pub use error::{
    CatalogError, RegistryError, UnknownCapability, UnknownProtocolType, WriteOperation,
};
pub use models::{
    AssertionConsumerService, CasRegisteredService, CasSpDetails, Capability, ClientApp,
    ClientAppProtocol, OidcRegisteredService, OidcRpDetails, ProtocolType, RegisteredService,
    Saml2SpDetails, SamlRegisteredService, ServiceHeader, SubjectType,
};
pub use network::{NetworkService, NetworkServiceError, NetworkServiceLogic, NetworkServiceType};

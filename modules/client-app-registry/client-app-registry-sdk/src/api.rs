//! Public API traits for the client application registry.

use async_trait::async_trait;

use crate::error::{CatalogError, RegistryError};
use crate::models::{Capability, ClientApp, ProtocolType, RegisteredService};

/// Handle to the remote catalog of client applications.
///
/// Implementations own their connection lifecycle and publish readiness
/// through [`ClientAppCatalog::is_ready`]. Lookups return `Ok(None)` for
/// records that do not exist.
#[async_trait]
pub trait ClientAppCatalog: Send + Sync {
    /// Whether the catalog connection has completed its bootstrap.
    fn is_ready(&self) -> bool;

    /// Full listing, in catalog order.
    ///
    /// # Errors
    /// Returns `CatalogError` on transport or decoding failure.
    async fn list(&self) -> Result<Vec<ClientApp>, CatalogError>;

    /// Fetch by id. With `protocol` set, only a record of that type matches.
    ///
    /// # Errors
    /// Returns `CatalogError` on transport or decoding failure.
    async fn get_by_id(
        &self,
        id: i64,
        protocol: Option<ProtocolType>,
    ) -> Result<Option<ClientApp>, CatalogError>;

    /// Fetch by unique name. With `protocol` set, only a record of that type
    /// matches.
    ///
    /// # Errors
    /// Returns `CatalogError` on transport or decoding failure.
    async fn get_by_name(
        &self,
        name: &str,
        protocol: Option<ProtocolType>,
    ) -> Result<Option<ClientApp>, CatalogError>;
}

/// Registry lookup contract consumed by the authentication gateway.
///
/// ```ignore
/// let registry: Arc<dyn ServiceRegistry> = module.registry()?;
///
/// if let Some(service) = registry.find_by_name_as("app1", Capability::OidcRelyingParty).await? {
///     let oidc = service.as_oidc();
/// }
/// ```
///
/// Negative results are values, not errors: a registry whose backing store
/// is not yet available answers with an empty listing and `None` lookups.
#[async_trait]
pub trait ServiceRegistry: Send + Sync {
    /// Load every registered service.
    ///
    /// # Errors
    /// Returns `RegistryError::Catalog` when the backing store fails.
    async fn load(&self) -> Result<Vec<RegisteredService>, RegistryError>;

    /// Find a service by id, whatever its protocol.
    ///
    /// # Errors
    /// Returns `RegistryError::Catalog` when the backing store fails.
    async fn find_by_id(&self, id: i64) -> Result<Option<RegisteredService>, RegistryError>;

    /// Find a service by id among those providing `capability`.
    ///
    /// # Errors
    /// Returns `RegistryError::Catalog` when the backing store fails.
    async fn find_by_id_as(
        &self,
        id: i64,
        capability: Capability,
    ) -> Result<Option<RegisteredService>, RegistryError>;

    /// Find a service by its unique name, whatever its protocol.
    ///
    /// # Errors
    /// Returns `RegistryError::Catalog` when the backing store fails.
    async fn find_by_name(&self, name: &str) -> Result<Option<RegisteredService>, RegistryError>;

    /// Find a service by name among those providing `capability`.
    ///
    /// # Errors
    /// Returns `RegistryError::Catalog` when the backing store fails.
    async fn find_by_name_as(
        &self,
        name: &str,
        capability: Capability,
    ) -> Result<Option<RegisteredService>, RegistryError>;

    /// Number of services [`ServiceRegistry::load`] would return.
    ///
    /// # Errors
    /// Returns `RegistryError::Catalog` when the backing store fails.
    async fn count(&self) -> Result<usize, RegistryError> {
        Ok(self.load().await?.len())
    }

    /// Persist a service.
    ///
    /// # Errors
    /// Returns `RegistryError::UnsupportedOperation` for read-only registries.
    fn save(&self, service: &RegisteredService) -> Result<RegisteredService, RegistryError>;

    /// Remove a service.
    ///
    /// # Errors
    /// Returns `RegistryError::UnsupportedOperation` for read-only registries.
    fn delete(&self, service: &RegisteredService) -> Result<bool, RegistryError>;
}

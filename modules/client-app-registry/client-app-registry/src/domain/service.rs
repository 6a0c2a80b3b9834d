//! Read-only [`ServiceRegistry`] backed by the remote client app catalog.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use client_app_registry_sdk::{
    Capability, ClientApp, ClientAppCatalog, RegisteredService, RegistryError, ServiceRegistry,
    WriteOperation,
};
use tracing::{debug, info, warn};

use super::mapper::to_registered_service;

const NOT_READY: &str = "Client app catalog is not yet ready to fetch application definitions";

#[derive(Clone, Copy)]
enum Lookup<'a> {
    Id(i64),
    Name(&'a str),
}

impl fmt::Display for Lookup<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id {id}"),
            Self::Name(name) => write!(f, "name '{name}'"),
        }
    }
}

/// Registry adapter over a [`ClientAppCatalog`].
///
/// Holds no cache: every lookup goes to the catalog, so results are as
/// fresh as the catalog itself. Until the catalog reports ready, listings
/// are empty and lookups are absent, with no remote call made.
pub struct ServiceRegistryAdapter {
    catalog: Arc<dyn ClientAppCatalog>,
}

impl ServiceRegistryAdapter {
    #[must_use]
    pub fn new(catalog: Arc<dyn ClientAppCatalog>) -> Self {
        Self { catalog }
    }

    async fn find(
        &self,
        lookup: Lookup<'_>,
        capability: Option<Capability>,
    ) -> Result<Option<RegisteredService>, RegistryError> {
        if !self.catalog.is_ready() {
            debug!(%lookup, "{NOT_READY}");
            return Ok(None);
        }

        let protocol = match capability {
            None => None,
            Some(capability) => {
                let Some(protocol) = capability.protocol_type() else {
                    debug!(%lookup, %capability, "Capability matches no single protocol type");
                    return Ok(None);
                };
                Some(protocol)
            }
        };

        info!(%lookup, ?protocol, "Searching for application definition");
        let app = match lookup {
            Lookup::Id(id) => self.catalog.get_by_id(id, protocol).await?,
            Lookup::Name(name) => self.catalog.get_by_name(name, protocol).await?,
        };

        Ok(app.and_then(|app| accept(app, capability)))
    }
}

/// Map a fetched record, dropping it when it does not provide `capability`.
fn accept(app: ClientApp, capability: Option<Capability>) -> Option<RegisteredService> {
    if let Some(capability) = capability
        && !capability.is_satisfied_by(app.protocol_type())
    {
        warn!(
            id = app.id,
            name = %app.name,
            found = %app.protocol_type(),
            %capability,
            "Catalog returned a record of the wrong protocol type"
        );
        return None;
    }
    Some(to_registered_service(app))
}

#[async_trait]
impl ServiceRegistry for ServiceRegistryAdapter {
    async fn load(&self) -> Result<Vec<RegisteredService>, RegistryError> {
        if !self.catalog.is_ready() {
            debug!("{NOT_READY}");
            return Ok(Vec::new());
        }

        let services: Vec<RegisteredService> = self
            .catalog
            .list()
            .await?
            .into_iter()
            .map(to_registered_service)
            .collect();
        info!(count = services.len(), "Loaded application definitions");
        Ok(services)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<RegisteredService>, RegistryError> {
        self.find(Lookup::Id(id), None).await
    }

    async fn find_by_id_as(
        &self,
        id: i64,
        capability: Capability,
    ) -> Result<Option<RegisteredService>, RegistryError> {
        self.find(Lookup::Id(id), Some(capability)).await
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<RegisteredService>, RegistryError> {
        self.find(Lookup::Name(name), None).await
    }

    async fn find_by_name_as(
        &self,
        name: &str,
        capability: Capability,
    ) -> Result<Option<RegisteredService>, RegistryError> {
        self.find(Lookup::Name(name), Some(capability)).await
    }

    fn save(&self, service: &RegisteredService) -> Result<RegisteredService, RegistryError> {
        warn!(id = service.id(), "Rejecting save on read-only registry");
        Err(RegistryError::UnsupportedOperation {
            operation: WriteOperation::Save,
        })
    }

    fn delete(&self, service: &RegisteredService) -> Result<bool, RegistryError> {
        warn!(id = service.id(), "Rejecting delete on read-only registry");
        Err(RegistryError::UnsupportedOperation {
            operation: WriteOperation::Delete,
        })
    }
}

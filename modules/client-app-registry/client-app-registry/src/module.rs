use std::sync::Arc;

use anyhow::Context;
use client_app_registry_sdk::{ClientAppCatalog, ServiceRegistry};
use tokio::runtime::Handle;
use tracing::info;

use crate::config::ClientAppRegistryConfig;
use crate::domain::readiness::{ReadinessGate, ReadinessProbe};
use crate::domain::service::ServiceRegistryAdapter;
use crate::infra::catalog::{BootstrapHandle, RemoteCatalogClient};

struct ModuleState {
    registry: Arc<dyn ServiceRegistry>,
    readiness: Option<ReadinessProbe>,
    bootstrap: Option<BootstrapHandle>,
}

/// Client app registry module: wires the catalog client, its bootstrap
/// probe and the registry adapter.
pub struct ClientAppRegistryModule {
    state: arc_swap::ArcSwapOption<ModuleState>,
}

impl Default for ClientAppRegistryModule {
    fn default() -> Self {
        Self {
            state: arc_swap::ArcSwapOption::from(None),
        }
    }
}

impl ClientAppRegistryModule {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the remote catalog client from `config` and start probing the
    /// catalog until it is ready. Must be called inside a tokio runtime.
    ///
    /// # Errors
    /// Returns an error outside a tokio runtime or if the HTTP client cannot
    /// be built.
    pub fn init(&self, config: &ClientAppRegistryConfig) -> anyhow::Result<()> {
        info!(base_url = %config.catalog.base_url, "Initializing client app registry module");

        let runtime = Handle::try_current()
            .context("client app registry must be initialized inside a tokio runtime")?;

        let client = Arc::new(
            RemoteCatalogClient::new(&config.catalog, ReadinessGate::new())
                .context("Failed to create client app catalog client")?,
        );
        let readiness = client.readiness();
        let bootstrap = client.start_bootstrap(&runtime);

        self.state.store(Some(Arc::new(ModuleState {
            registry: Arc::new(ServiceRegistryAdapter::new(client)),
            readiness: Some(readiness),
            bootstrap: Some(bootstrap),
        })));

        info!("Client app registry module initialized");
        Ok(())
    }

    /// Front an already-built catalog. Its readiness is the catalog's own.
    pub fn init_with_catalog(&self, catalog: Arc<dyn ClientAppCatalog>) {
        self.state.store(Some(Arc::new(ModuleState {
            registry: Arc::new(ServiceRegistryAdapter::new(catalog)),
            readiness: None,
            bootstrap: None,
        })));
        info!("Client app registry module initialized with a provided catalog");
    }

    /// # Errors
    /// Returns an error if the module has not been initialized.
    pub fn registry(&self) -> anyhow::Result<Arc<dyn ServiceRegistry>> {
        self.state
            .load_full()
            .map(|state| Arc::clone(&state.registry))
            .ok_or_else(|| anyhow::anyhow!("client app registry module not initialized"))
    }

    /// Readiness of the catalog built by [`Self::init`], if any.
    #[must_use]
    pub fn readiness(&self) -> Option<ReadinessProbe> {
        self.state
            .load_full()
            .and_then(|state| state.readiness.clone())
    }

    /// Whether the bootstrap probe started by [`Self::init`] has ended.
    #[must_use]
    pub fn bootstrap_finished(&self) -> bool {
        self.state.load_full().is_none_or(|state| {
            state
                .bootstrap
                .as_ref()
                .is_none_or(BootstrapHandle::is_finished)
        })
    }
}

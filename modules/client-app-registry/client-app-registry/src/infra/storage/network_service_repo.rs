use async_trait::async_trait;
use client_app_registry_sdk::{
    NetworkService, NetworkServiceError, NetworkServiceLogic, NetworkServiceType,
};
use dashmap::DashMap;
use rand::seq::IndexedRandom;
use tracing::debug;

/// In-memory network service directory backed by `DashMap`.
///
/// Instances of each type are kept in registration order.
pub struct InMemoryNetworkServiceLogic {
    store: DashMap<NetworkServiceType, Vec<NetworkService>>,
}

impl InMemoryNetworkServiceLogic {
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: DashMap::new(),
        }
    }
}

impl Default for InMemoryNetworkServiceLogic {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NetworkServiceLogic for InMemoryNetworkServiceLogic {
    async fn list(
        &self,
        service_type: NetworkServiceType,
    ) -> Result<Vec<NetworkService>, NetworkServiceError> {
        Ok(self
            .store
            .get(&service_type)
            .map(|entry| entry.value().clone())
            .unwrap_or_default())
    }

    async fn get(
        &self,
        service_type: NetworkServiceType,
    ) -> Result<Option<NetworkService>, NetworkServiceError> {
        Ok(self
            .store
            .get(&service_type)
            .and_then(|entry| entry.value().choose(&mut rand::rng()).cloned()))
    }

    async fn register(&self, service: NetworkService) -> Result<(), NetworkServiceError> {
        let mut entry = self.store.entry(service.service_type).or_default();
        if entry.contains(&service) {
            debug!(
                service_type = %service.service_type,
                address = %service.address,
                "Network service already registered"
            );
        } else {
            debug!(
                service_type = %service.service_type,
                address = %service.address,
                "Registering network service"
            );
            entry.push(service);
        }
        Ok(())
    }

    async fn unregister(&self, service: NetworkService) -> Result<(), NetworkServiceError> {
        if let Some(mut entry) = self.store.get_mut(&service.service_type) {
            entry.retain(|s| s != &service);
        }
        debug!(
            service_type = %service.service_type,
            address = %service.address,
            "Unregistered network service"
        );
        Ok(())
    }
}

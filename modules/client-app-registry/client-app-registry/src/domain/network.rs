//! Network service directory front.
//!
//! Reads are forwarded and awaited. Registration changes are spawned on the
//! runtime and the caller gets a handle to the pending completion.

use std::sync::Arc;

use client_app_registry_sdk::{
    NetworkService, NetworkServiceError, NetworkServiceLogic, NetworkServiceType,
};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

/// Pending completion of a spawned register/unregister.
#[derive(Debug)]
pub struct RegistrationHandle {
    task: JoinHandle<Result<(), NetworkServiceError>>,
}

impl RegistrationHandle {
    /// Wait for the operation to finish.
    ///
    /// # Errors
    /// Returns the logic's error, or `NetworkServiceError::Join` when the
    /// task panicked or was aborted.
    pub async fn wait(self) -> Result<(), NetworkServiceError> {
        self.task
            .await
            .map_err(|e| NetworkServiceError::Join(e.to_string()))?
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Thin delegate over a [`NetworkServiceLogic`].
#[derive(Clone)]
pub struct NetworkServiceDelegate {
    logic: Arc<dyn NetworkServiceLogic>,
    runtime: Handle,
}

impl NetworkServiceDelegate {
    #[must_use]
    pub fn new(logic: Arc<dyn NetworkServiceLogic>, runtime: Handle) -> Self {
        Self { logic, runtime }
    }

    /// # Errors
    /// Returns the logic's error.
    pub async fn list(
        &self,
        service_type: NetworkServiceType,
    ) -> Result<Vec<NetworkService>, NetworkServiceError> {
        self.logic.list(service_type).await
    }

    /// # Errors
    /// Returns the logic's error.
    pub async fn get(
        &self,
        service_type: NetworkServiceType,
    ) -> Result<Option<NetworkService>, NetworkServiceError> {
        self.logic.get(service_type).await
    }

    /// Register `service` in the background.
    #[must_use = "the handle reports the registration outcome"]
    pub fn register(&self, service: NetworkService) -> RegistrationHandle {
        debug!(
            service_type = %service.service_type,
            address = %service.address,
            "Scheduling network service registration"
        );
        let logic = Arc::clone(&self.logic);
        RegistrationHandle {
            task: self
                .runtime
                .spawn(async move { logic.register(service).await }),
        }
    }

    /// Unregister `service` in the background.
    #[must_use = "the handle reports the removal outcome"]
    pub fn unregister(&self, service: NetworkService) -> RegistrationHandle {
        debug!(
            service_type = %service.service_type,
            address = %service.address,
            "Scheduling network service removal"
        );
        let logic = Arc::clone(&self.logic);
        RegistrationHandle {
            task: self
                .runtime
                .spawn(async move { logic.unregister(service).await }),
        }
    }
}

//! Tests for the network service delegate over the in-memory directory

use std::sync::Arc;

use async_trait::async_trait;
use client_app_registry::{
    InMemoryNetworkServiceLogic, NetworkService, NetworkServiceDelegate, NetworkServiceError,
    NetworkServiceLogic, NetworkServiceType,
};
use tokio::runtime::Handle;
use tokio::sync::Notify;

fn delegate(logic: Arc<dyn NetworkServiceLogic>) -> NetworkServiceDelegate {
    NetworkServiceDelegate::new(logic, Handle::current())
}

#[tokio::test]
async fn test_register_then_list_and_get() {
    let delegate = delegate(Arc::new(InMemoryNetworkServiceLogic::new()));
    let wa = NetworkService::new(NetworkServiceType::Wa, "http://wa1:8080/syncope-wa");

    delegate.register(wa.clone()).wait().await.unwrap();

    assert_eq!(
        delegate.list(NetworkServiceType::Wa).await.unwrap(),
        vec![wa.clone()]
    );
    assert_eq!(delegate.get(NetworkServiceType::Wa).await.unwrap(), Some(wa));
    assert!(delegate.get(NetworkServiceType::Sra).await.unwrap().is_none());
}

#[tokio::test]
async fn test_unregister() {
    let delegate = delegate(Arc::new(InMemoryNetworkServiceLogic::new()));
    let sra = NetworkService::new(NetworkServiceType::Sra, "http://sra:8080");

    delegate.register(sra.clone()).wait().await.unwrap();
    delegate.unregister(sra.clone()).wait().await.unwrap();
    // Removing again is a no-op.
    delegate.unregister(sra).wait().await.unwrap();

    assert!(delegate.list(NetworkServiceType::Sra).await.unwrap().is_empty());
}

/// Logic whose register blocks until released.
struct GatedLogic {
    release: Notify,
    inner: InMemoryNetworkServiceLogic,
}

#[async_trait]
impl NetworkServiceLogic for GatedLogic {
    async fn list(
        &self,
        service_type: NetworkServiceType,
    ) -> Result<Vec<NetworkService>, NetworkServiceError> {
        self.inner.list(service_type).await
    }

    async fn get(
        &self,
        service_type: NetworkServiceType,
    ) -> Result<Option<NetworkService>, NetworkServiceError> {
        self.inner.get(service_type).await
    }

    async fn register(&self, service: NetworkService) -> Result<(), NetworkServiceError> {
        self.release.notified().await;
        self.inner.register(service).await
    }

    async fn unregister(&self, service: NetworkService) -> Result<(), NetworkServiceError> {
        self.inner.unregister(service).await
    }
}

#[tokio::test]
async fn test_register_returns_before_completion() {
    let logic = Arc::new(GatedLogic {
        release: Notify::new(),
        inner: InMemoryNetworkServiceLogic::new(),
    });
    let delegate = delegate(Arc::clone(&logic) as Arc<dyn NetworkServiceLogic>);
    let master = NetworkService::new(NetworkServiceType::Master, "http://core:9080");

    let pending = delegate.register(master.clone());

    assert!(!pending.is_finished());
    assert!(
        delegate
            .list(NetworkServiceType::Master)
            .await
            .unwrap()
            .is_empty()
    );

    // notify_one stores a permit if the task has not reached notified() yet.
    logic.release.notify_one();
    pending.wait().await.unwrap();

    assert_eq!(
        delegate.list(NetworkServiceType::Master).await.unwrap(),
        vec![master]
    );
}

struct FailingLogic;

#[async_trait]
impl NetworkServiceLogic for FailingLogic {
    async fn list(
        &self,
        _service_type: NetworkServiceType,
    ) -> Result<Vec<NetworkService>, NetworkServiceError> {
        Ok(Vec::new())
    }

    async fn get(
        &self,
        _service_type: NetworkServiceType,
    ) -> Result<Option<NetworkService>, NetworkServiceError> {
        Ok(None)
    }

    async fn register(&self, _service: NetworkService) -> Result<(), NetworkServiceError> {
        Err(NetworkServiceError::Internal("directory unavailable".to_owned()))
    }

    async fn unregister(&self, _service: NetworkService) -> Result<(), NetworkServiceError> {
        panic!("unregister exploded");
    }
}

#[tokio::test]
async fn test_errors_surface_through_handle() {
    let delegate = delegate(Arc::new(FailingLogic));
    let wa = NetworkService::new(NetworkServiceType::Wa, "http://wa:8080");

    let err = delegate.register(wa.clone()).wait().await.unwrap_err();
    assert_eq!(
        err,
        NetworkServiceError::Internal("directory unavailable".to_owned())
    );

    let err = delegate.unregister(wa).wait().await.unwrap_err();
    assert!(matches!(err, NetworkServiceError::Join(_)));
}

#[test]
fn test_service_type_parsing() {
    assert_eq!("wa".parse::<NetworkServiceType>(), Ok(NetworkServiceType::Wa));
    assert_eq!(
        "MASTER".parse::<NetworkServiceType>(),
        Ok(NetworkServiceType::Master)
    );
    assert_eq!(
        "proxy".parse::<NetworkServiceType>(),
        Err(NetworkServiceError::InvalidType("proxy".to_owned()))
    );
}

#[test]
fn test_network_service_json_shape() {
    let service = NetworkService::new(NetworkServiceType::Sra, "http://sra:8080");
    let value = serde_json::to_value(&service).unwrap();
    assert_eq!(
        value,
        serde_json::json!({"type": "SRA", "address": "http://sra:8080"})
    );
}

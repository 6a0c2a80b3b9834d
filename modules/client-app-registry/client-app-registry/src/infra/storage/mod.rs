pub mod network_service_repo;

pub use network_service_repo::InMemoryNetworkServiceLogic;

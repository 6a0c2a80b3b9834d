pub mod mapper;
pub mod network;
pub mod readiness;
pub mod service;

pub use mapper::to_registered_service;
pub use network::{NetworkServiceDelegate, RegistrationHandle};
pub use readiness::{ReadinessGate, ReadinessProbe};
pub use service::ServiceRegistryAdapter;

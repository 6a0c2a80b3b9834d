pub mod remote;

pub use remote::{BootstrapHandle, RemoteCatalogClient};

//! HTTP client for the schema registry

pub mod registry_client;

pub use registry_client::{RegistryClient, RegistryClientConfig};

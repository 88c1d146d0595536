//! Schema registry access: client, registration and id strategies.

pub mod client;
pub mod error;
pub mod registrar;
pub mod strategy;
pub mod types;

pub use client::{RegistryClient, RegistryClientConfig};
pub use error::{SchemaError, SchemaResult};
pub use registrar::SchemaRegistrar;
pub use strategy::{ArtifactIdStrategy, GlobalIdResolver, GlobalIdStrategy};
pub use types::{ArtifactMetaData, ArtifactState, ArtifactType, IfExists};

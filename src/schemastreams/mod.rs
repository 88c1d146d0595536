pub mod config;
pub mod driver;
pub mod error;
pub mod kafka;
pub mod schema;
pub mod serdes;

// Re-export the types the example binaries and tests reach for
pub use config::ExampleConfig;
pub use error::{SchemaStreamsError, SchemaStreamsResult};

pub mod config;
pub mod store;
pub mod mongo;
pub mod memory;
pub mod fetch;
pub mod apply;
pub mod loader;

pub use config::ConnectionConfig;
pub use store::{DocumentStore, ValidationAction, ValidationLevel, ValidatorCommand};
pub use mongo::MongoStore;
pub use memory::InMemoryStore;
pub use fetch::SchemaFetcher;
pub use apply::{ApplyOptions, ApplyReport, SchemaApplier};
pub use loader::{DataLoader, InsertReport};

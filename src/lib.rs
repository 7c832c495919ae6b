//! # mongoschema
//!
//! Tools for putting a JSON Schema in front of a MongoDB collection.
//!
//! Two one-shot pipelines share one configuration:
//!
//! - **apply-schema** fetches a JSON Schema from `SCHEMA_URL`, translates it
//!   into MongoDB's `$jsonSchema` dialect and installs it on the collection
//!   with `validationLevel: strict` and `validationAction: error`.
//! - **insert-data** loads a JSON file (one object or an array of objects)
//!   and inserts it, reporting the generated identifiers.
//!
//! ## Quick Start
//!
//! ```bash
//! export MONGO_URI=mongodb://localhost:27017
//! export DB_NAME=shop COLLECTION_NAME=customers
//! export SCHEMA_URL=https://example.com/customer.schema.json
//! apply-schema
//! insert-data customers.json
//! ```
//!
//! ## As a Library
//!
//! ```rust
//! use mongoschema::prelude::*;
//! use serde_json::json;
//!
//! let validator = build_validator(json!({
//!     "type": "object",
//!     "properties": { "email": { "type": "string", "format": "email" } }
//! })).unwrap();
//!
//! assert!(validator.check(Strictness::Lenient).is_ok());
//! assert_eq!(
//!     validator.document()["$jsonSchema"]["properties"]["email"]["pattern"],
//!     EMAIL_PATTERN
//! );
//! ```
//!
//! ## Crate Structure
//!
//! - `mongoschema-core` - translation, structural check, document shaping
//! - `mongoschema-storage` - configuration, MongoDB store, schema download,
//!   apply and load pipelines

use tracing_subscriber::{EnvFilter, FmtSubscriber};

// Re-export core types
pub use mongoschema_core::{
    build_validator, check_structure, format_pattern, is_valid_structure, translate_fragment,
    BsonType, Document, DocumentBatch, Error, MongoValidator, Result, Strictness,
    TranslationWarning, DATE_PATTERN, EMAIL_PATTERN, VALIDATOR_KEY,
};

// Re-export storage
pub use mongoschema_storage::{
    ApplyOptions, ApplyReport, ConnectionConfig, DataLoader, DocumentStore, InMemoryStore,
    InsertReport, MongoStore, SchemaApplier, SchemaFetcher, ValidationAction, ValidationLevel,
    ValidatorCommand,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        build_validator, check_structure, translate_fragment, ApplyOptions, ConnectionConfig,
        DataLoader, DocumentBatch, DocumentStore, Error, InMemoryStore, MongoStore,
        MongoValidator, Result, SchemaApplier, SchemaFetcher, Strictness, ValidationAction,
        ValidationLevel, DATE_PATTERN, EMAIL_PATTERN,
    };
}

/// Install the global tracing subscriber for the binaries.
///
/// `RUST_LOG` wins when set; otherwise `level` (`trace`, `debug`, `info`,
/// `warn`, `error`) is the maximum level. Logs go to stderr so status lines on
/// stdout stay readable.
pub fn init_logging(level: &str) -> anyhow::Result<()> {
    let level = match level {
        "trace" | "debug" | "info" | "warn" | "error" => level,
        _ => "info",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

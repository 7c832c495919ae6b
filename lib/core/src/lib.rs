//! # mongoschema Core
//!
//! Pure logic for turning JSON Schema documents into MongoDB validators and
//! JSON files into insertable documents. Nothing here talks to the network or
//! the database.
//!
//! - [`build_validator`] - wrap and translate a JSON Schema as `$jsonSchema`
//! - [`translate_fragment`] - the recursive `type`/`format` rewrite
//! - [`check_structure`] - shallow shape check of a validator document
//! - [`DocumentBatch`] - a data file as one document or a bulk batch
//!
//! ## Example
//!
//! ```rust
//! use mongoschema_core::{build_validator, Strictness};
//! use serde_json::json;
//!
//! let schema = json!({
//!     "$schema": "http://json-schema.org/draft-07/schema#",
//!     "type": "object",
//!     "properties": {
//!         "email": { "type": "string", "format": "email" },
//!         "age": { "type": "integer" }
//!     }
//! });
//!
//! let validator = build_validator(schema).unwrap();
//! assert!(validator.check(Strictness::Strict).is_ok());
//! assert_eq!(validator.document()["$jsonSchema"]["properties"]["age"]["bsonType"], "int");
//! ```

pub mod error;
pub mod translate;
pub mod validator;
pub mod document;

pub use error::{Error, Result};
pub use translate::{
    build_validator, format_pattern, translate_fragment, BsonType, MongoValidator,
    TranslationWarning, BSON_TYPE_KEY, DATE_PATTERN, EMAIL_PATTERN, VALIDATOR_KEY,
};
pub use validator::{check_structure, is_valid_structure, Strictness};
pub use document::{Document, DocumentBatch};

/// Human-readable name of a JSON value's kind, for error messages
pub(crate) fn value_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

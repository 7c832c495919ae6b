//! Shaping loaded JSON into documents for insertion.

use crate::{value_kind, Error, Result};
use serde_json::{Map, Value};
use std::path::Path;

pub type Document = Map<String, Value>;

/// What a data file turned into: one document or a bulk batch
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentBatch {
    Single(Document),
    Many(Vec<Document>),
}

impl DocumentBatch {
    /// Accept a single non-empty object or a non-empty array of objects
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(doc) if doc.is_empty() => Err(Error::EmptyData),
            Value::Object(doc) => Ok(Self::Single(doc)),
            Value::Array(items) if items.is_empty() => Err(Error::EmptyData),
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| match item {
                    Value::Object(doc) => Ok(doc),
                    other => Err(Error::InvalidShape(format!(
                        "element {i} must be a JSON object, got {}",
                        value_kind(&other)
                    ))),
                })
                .collect::<Result<Vec<_>>>()
                .map(Self::Many),
            other => Err(Error::InvalidShape(format!(
                "data must be a JSON object or array, got {}",
                value_kind(&other)
            ))),
        }
    }

    /// Parse raw file contents. `path` is only used for error reporting.
    pub fn from_slice(bytes: &[u8], path: &Path) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes).map_err(|source| Error::InvalidJson {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_value(value)
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Many(docs) => docs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_documents(self) -> Vec<Document> {
        match self {
            Self::Single(doc) => vec![doc],
            Self::Many(docs) => docs,
        }
    }
}

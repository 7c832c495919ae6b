//! Shallow structural check of a MongoDB validator document.
//!
//! This only looks at the wrapper and the top of the `$jsonSchema` fragment;
//! the server is the one that actually interprets the schema.

use crate::translate::{BSON_TYPE_KEY, VALIDATOR_KEY};
use crate::{value_kind, Error, Result};
use serde_json::Value;

/// Which keys the top-level `$jsonSchema` fragment must carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Require `properties` only
    #[default]
    Lenient,
    /// Require both `bsonType` and `properties`
    Strict,
}

impl Strictness {
    pub fn required_keys(&self) -> &'static [&'static str] {
        match self {
            Self::Lenient => &["properties"],
            Self::Strict => &[BSON_TYPE_KEY, "properties"],
        }
    }
}

/// Check that `candidate` looks like `{"$jsonSchema": {"properties": ...}}`
pub fn check_structure(candidate: &Value, strictness: Strictness) -> Result<()> {
    let wrapper = candidate.as_object().ok_or_else(|| {
        Error::InvalidValidator(format!(
            "schema must be a JSON object, got {}",
            value_kind(candidate)
        ))
    })?;

    let fragment = wrapper
        .get(VALIDATOR_KEY)
        .ok_or_else(|| Error::InvalidValidator(format!("schema must include {VALIDATOR_KEY} property")))?;

    let fragment = fragment.as_object().ok_or_else(|| {
        Error::InvalidValidator(format!(
            "{VALIDATOR_KEY} must be a JSON object, got {}",
            value_kind(fragment)
        ))
    })?;

    let missing: Vec<&str> = strictness
        .required_keys()
        .iter()
        .copied()
        .filter(|key| !fragment.contains_key(*key))
        .collect();

    if !missing.is_empty() {
        return Err(Error::InvalidValidator(format!(
            "{VALIDATOR_KEY} must include {}",
            missing.join(" and ")
        )));
    }

    Ok(())
}

pub fn is_valid_structure(candidate: &Value, strictness: Strictness) -> bool {
    check_structure(candidate, strictness).is_ok()
}

use mongoschema_core::{Document, Result};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

/// `validationLevel` of a `collMod` command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationLevel {
    #[default]
    Strict,
    Moderate,
    Off,
}

impl ValidationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Moderate => "moderate",
            Self::Off => "off",
        }
    }
}

impl FromStr for ValidationLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "moderate" => Ok(Self::Moderate),
            "off" => Ok(Self::Off),
            other => Err(format!("unknown validation level '{other}' (expected strict, moderate or off)")),
        }
    }
}

impl fmt::Display for ValidationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `validationAction` of a `collMod` command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationAction {
    /// Reject non-conforming writes
    #[default]
    Error,
    /// Accept them and log a warning server-side
    Warn,
}

impl ValidationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
        }
    }
}

impl FromStr for ValidationAction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" => Ok(Self::Warn),
            other => Err(format!("unknown validation action '{other}' (expected error or warn)")),
        }
    }
}

impl fmt::Display for ValidationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a `collMod` needs apart from the collection name
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatorCommand {
    pub validator: Value,
    pub level: ValidationLevel,
    pub action: ValidationAction,
}

impl ValidatorCommand {
    pub fn new(validator: Value) -> Self {
        Self {
            validator,
            level: ValidationLevel::default(),
            action: ValidationAction::default(),
        }
    }

    /// The administrative command as MongoDB expects it
    pub fn to_command(&self, collection: &str) -> Value {
        json!({
            "collMod": collection,
            "validator": self.validator,
            "validationLevel": self.level.as_str(),
            "validationAction": self.action.as_str(),
        })
    }
}

/// The handful of store operations the two pipelines need.
///
/// A store is bound to one database and one collection. Implementations map
/// their own failures onto `Error::StoreCommand` and `Error::Insertion`.
#[allow(async_fn_in_trait)]
pub trait DocumentStore {
    fn collection_name(&self) -> &str;

    async fn collection_exists(&self) -> Result<bool>;

    async fn create_collection(&self) -> Result<()>;

    async fn apply_validator(&self, command: &ValidatorCommand) -> Result<()>;

    /// Returns the generated identifier
    async fn insert_one(&self, document: Document) -> Result<String>;

    /// Returns identifiers in input order
    async fn insert_many(&self, documents: Vec<Document>) -> Result<Vec<String>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_strict_error() {
        let command = ValidatorCommand::new(json!({ "$jsonSchema": { "properties": {} } }));
        let doc = command.to_command("people");

        assert_eq!(doc["collMod"], json!("people"));
        assert_eq!(doc["validationLevel"], json!("strict"));
        assert_eq!(doc["validationAction"], json!("error"));
        assert_eq!(doc["validator"]["$jsonSchema"], json!({ "properties": {} }));
    }

    #[test]
    fn test_parse_levels_and_actions() {
        assert_eq!("Moderate".parse::<ValidationLevel>().unwrap(), ValidationLevel::Moderate);
        assert_eq!("warn".parse::<ValidationAction>().unwrap(), ValidationAction::Warn);
        assert!("loose".parse::<ValidationLevel>().is_err());
    }
}

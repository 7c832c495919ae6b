//! JSON Schema to MongoDB `$jsonSchema` translation
//!
//! MongoDB validators speak a restricted dialect of JSON Schema: types are
//! spelled with `bsonType` and the BSON type vocabulary, and `format` is not
//! understood at all. The translator walks a schema fragment once, renaming
//! `type` to `bsonType` through a fixed table and replacing the formats we
//! know with an equivalent `pattern`. Every other keyword passes through.

use crate::validator::{check_structure, Strictness};
use crate::{value_kind, Error, Result};
use serde_json::{Map, Value};
use std::fmt;
use tracing::{debug, warn};

/// Top-level key MongoDB expects around a JSON Schema validator
pub const VALIDATOR_KEY: &str = "$jsonSchema";

/// Key holding the translated type of a fragment
pub const BSON_TYPE_KEY: &str = "bsonType";

/// Pattern substituted for `format: "email"`
pub const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";

/// Pattern substituted for `format: "date"`
pub const DATE_PATTERN: &str = r"^\d{4}-\d{2}-\d{2}$";

const DIALECT_KEY: &str = "$schema";

/// Keywords whose object value maps field names to sub-schemas. Their keys
/// are names, never keywords.
const NAMED_SCHEMA_KEYS: [&str; 3] = ["properties", "patternProperties", "dependencies"];

/// BSON type names understood by `$jsonSchema`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BsonType {
    Int,
    Double,
    String,
    Bool,
    Array,
    Object,
}

impl BsonType {
    /// Map a JSON Schema `type` name to its BSON counterpart
    pub fn from_json_type(name: &str) -> Option<Self> {
        match name {
            "integer" => Some(Self::Int),
            "number" => Some(Self::Double),
            "string" => Some(Self::String),
            "boolean" => Some(Self::Bool),
            "array" => Some(Self::Array),
            "object" => Some(Self::Object),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Double => "double",
            Self::String => "string",
            Self::Bool => "bool",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for BsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Regular expression standing in for a JSON Schema `format`, if we know one
pub fn format_pattern(format: &str) -> Option<&'static str> {
    match format {
        "email" => Some(EMAIL_PATTERN),
        "date" => Some(DATE_PATTERN),
        _ => None,
    }
}

/// Lossy spots found while translating. Translation never fails on these;
/// they are reported so the caller can surface them.
#[derive(Debug, Clone, PartialEq)]
pub enum TranslationWarning {
    /// `type` held something outside the table and became `string`
    UnknownType { path: String, found: Value },
    /// `format` on a string field had no pattern equivalent and was dropped
    UnsupportedFormat { path: String, format: String },
    /// `format` on a non-string field was dropped
    FormatIgnored {
        path: String,
        format: String,
        bson_type: Option<String>,
    },
}

impl fmt::Display for TranslationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownType { path, found } => {
                write!(f, "{path}: unknown type {found}, using bsonType \"string\"")
            }
            Self::UnsupportedFormat { path, format } => {
                write!(f, "{path}: format \"{format}\" has no pattern equivalent, dropped")
            }
            Self::FormatIgnored { path, format, bson_type } => match bson_type {
                Some(t) => write!(f, "{path}: format \"{format}\" ignored on bsonType \"{t}\""),
                None => write!(f, "{path}: format \"{format}\" ignored on untyped field"),
            },
        }
    }
}

/// A validator document ready to hand to `collMod`
#[derive(Debug, Clone)]
pub struct MongoValidator {
    document: Value,
    warnings: Vec<TranslationWarning>,
}

impl MongoValidator {
    /// The full `{"$jsonSchema": ...}` document
    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn into_document(self) -> Value {
        self.document
    }

    /// The translated fragment under `$jsonSchema`
    pub fn json_schema(&self) -> Option<&Value> {
        self.document.get(VALIDATOR_KEY)
    }

    pub fn warnings(&self) -> &[TranslationWarning] {
        &self.warnings
    }

    /// Shallow structural check of the assembled document
    pub fn check(&self, strictness: Strictness) -> Result<()> {
        check_structure(&self.document, strictness)
    }
}

/// Translate a schema fragment in place.
///
/// Recurses through every object value and array element. Returns the
/// degradations encountered, in visiting order.
pub fn translate_fragment(fragment: &mut Value) -> Vec<TranslationWarning> {
    let mut translator = Translator::default();
    translator.visit(fragment, "#");
    translator.warnings
}

/// Build a MongoDB validator from a full JSON Schema document.
///
/// Every top-level key except `$schema` is carried under `$jsonSchema` and
/// translated. Nested fragments never get a wrapper of their own.
pub fn build_validator(source: Value) -> Result<MongoValidator> {
    let source = match source {
        Value::Object(map) => map,
        other => {
            return Err(Error::InvalidSchema(format!(
                "expected a JSON object, got {}",
                value_kind(&other)
            )))
        }
    };

    let mut fragment = Value::Object(
        source
            .into_iter()
            .filter(|(key, _)| key.as_str() != DIALECT_KEY)
            .collect::<Map<String, Value>>(),
    );
    let warnings = translate_fragment(&mut fragment);
    debug!("Translated schema with {} warning(s)", warnings.len());

    let mut document = Map::new();
    document.insert(VALIDATOR_KEY.to_string(), fragment);

    Ok(MongoValidator {
        document: Value::Object(document),
        warnings,
    })
}

#[derive(Default)]
struct Translator {
    warnings: Vec<TranslationWarning>,
}

impl Translator {
    fn visit(&mut self, value: &mut Value, path: &str) {
        match value {
            Value::Object(map) => self.visit_schema(map, path),
            Value::Array(items) => {
                for (i, item) in items.iter_mut().enumerate() {
                    self.visit(item, &format!("{path}/{i}"));
                }
            }
            _ => {}
        }
    }

    fn visit_schema(&mut self, schema: &mut Map<String, Value>, path: &str) {
        if let Some(json_type) = schema.remove("type") {
            let bson_type = self.map_type(json_type, path);
            schema.insert(BSON_TYPE_KEY.to_string(), Value::String(bson_type.as_str().to_string()));
        }

        if let Some(format) = schema.remove("format") {
            self.substitute_format(schema, format, path);
        }

        // The renamed key holds a plain type name; only descend into the rest.
        for (key, child) in schema.iter_mut().filter(|(key, _)| key.as_str() != BSON_TYPE_KEY) {
            let child_path = format!("{path}/{}", escape_pointer(key));
            match child {
                Value::Object(named) if NAMED_SCHEMA_KEYS.contains(&key.as_str()) => {
                    for (name, sub_schema) in named.iter_mut() {
                        self.visit(sub_schema, &format!("{child_path}/{}", escape_pointer(name)));
                    }
                }
                other => self.visit(other, &child_path),
            }
        }
    }

    fn map_type(&mut self, json_type: Value, path: &str) -> BsonType {
        if let Some(bson_type) = json_type.as_str().and_then(BsonType::from_json_type) {
            return bson_type;
        }
        warn!("{}: unknown type {}, falling back to bsonType \"string\"", path, json_type);
        self.warnings.push(TranslationWarning::UnknownType {
            path: path.to_string(),
            found: json_type,
        });
        BsonType::String
    }

    fn substitute_format(&mut self, schema: &mut Map<String, Value>, format: Value, path: &str) {
        let format_name = match &format {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let bson_type = schema.get(BSON_TYPE_KEY).and_then(Value::as_str);

        if bson_type != Some(BsonType::String.as_str()) {
            warn!("{}: dropping format \"{}\" on non-string field", path, format_name);
            self.warnings.push(TranslationWarning::FormatIgnored {
                path: path.to_string(),
                format: format_name,
                bson_type: bson_type.map(str::to_string),
            });
            return;
        }

        match format.as_str().and_then(format_pattern) {
            Some(pattern) => {
                schema.insert("pattern".to_string(), Value::String(pattern.to_string()));
            }
            None => {
                warn!("{}: format \"{}\" has no pattern equivalent, dropping it", path, format_name);
                self.warnings.push(TranslationWarning::UnsupportedFormat {
                    path: path.to_string(),
                    format: format_name,
                });
            }
        }
    }
}

/// RFC 6901 escaping for a single pointer segment
fn escape_pointer(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

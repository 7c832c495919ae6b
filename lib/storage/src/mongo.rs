// MongoDB-backed document store
use crate::config::ConnectionConfig;
use crate::store::{DocumentStore, ValidatorCommand};
use mongodb::bson::{self, Bson};
use mongodb::{Client, Collection, Database};
use mongoschema_core::{Document, Error, Result};
use serde_json::Value;
use tracing::{debug, info};

/// A client handle bound to the configured database and collection
pub struct MongoStore {
    client: Client,
    database: Database,
    collection: Collection<bson::Document>,
    collection_name: String,
}

impl MongoStore {
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let client = Client::with_uri_str(&config.mongo_uri)
            .await
            .map_err(|e| Error::StoreCommand(format!("Failed to connect to MongoDB: {}", e)))?;
        let database = client.database(&config.database);
        let collection = database.collection::<bson::Document>(&config.collection);
        info!("Using {}.{}", config.database, config.collection);

        Ok(Self {
            client,
            database,
            collection,
            collection_name: config.collection.clone(),
        })
    }

    /// Close pooled connections and end server sessions
    pub async fn shutdown(self) {
        self.client.shutdown().await;
    }
}

impl DocumentStore for MongoStore {
    fn collection_name(&self) -> &str {
        &self.collection_name
    }

    async fn collection_exists(&self) -> Result<bool> {
        let names = self
            .database
            .list_collection_names()
            .await
            .map_err(|e| Error::StoreCommand(format!("Failed to list collections: {}", e)))?;
        Ok(names.iter().any(|name| name == &self.collection_name))
    }

    async fn create_collection(&self) -> Result<()> {
        self.database
            .create_collection(self.collection_name.as_str())
            .await
            .map_err(|e| Error::StoreCommand(format!("Failed to create collection: {}", e)))
    }

    async fn apply_validator(&self, command: &ValidatorCommand) -> Result<()> {
        let command = json_to_document(command.to_command(&self.collection_name))?;
        let reply = self
            .database
            .run_command(command)
            .await
            .map_err(|e| Error::StoreCommand(format!("collMod failed: {}", e)))?;
        debug!("collMod reply: {}", reply);
        Ok(())
    }

    async fn insert_one(&self, document: Document) -> Result<String> {
        let document = map_to_document(document)?;
        let result = self
            .collection
            .insert_one(document)
            .await
            .map_err(|e| Error::Insertion(e.to_string()))?;
        Ok(id_to_string(&result.inserted_id))
    }

    async fn insert_many(&self, documents: Vec<Document>) -> Result<Vec<String>> {
        let documents = documents
            .into_iter()
            .map(map_to_document)
            .collect::<Result<Vec<_>>>()?;
        let result = self
            .collection
            .insert_many(documents)
            .await
            .map_err(|e| Error::Insertion(e.to_string()))?;

        let mut ids: Vec<(usize, Bson)> = result.inserted_ids.into_iter().collect();
        ids.sort_by_key(|(index, _)| *index);
        Ok(ids.iter().map(|(_, id)| id_to_string(id)).collect())
    }
}

/// Relaxed extended-JSON conversion: small integers become `int`, larger ones
/// `long`, and `{"$oid": ...}`-style wrappers become their BSON types.
/// Integers past `i64::MAX` have no BSON type and are rejected.
fn map_to_document(map: Document) -> Result<bson::Document> {
    for (key, value) in &map {
        reject_unsigned(key, value)?;
    }
    bson::Document::try_from(map).map_err(|e| Error::Encoding(e.to_string()))
}

fn reject_unsigned(path: &str, value: &Value) -> Result<()> {
    match value {
        Value::Number(n) if n.is_u64() && n.as_i64().is_none() => Err(Error::Encoding(format!(
            "integer {} at '{}' does not fit in a 64-bit signed integer",
            n, path
        ))),
        Value::Object(map) => map
            .iter()
            .try_for_each(|(key, child)| reject_unsigned(&format!("{}.{}", path, key), child)),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .try_for_each(|(i, child)| reject_unsigned(&format!("{}.{}", path, i), child)),
        _ => Ok(()),
    }
}

fn json_to_document(value: Value) -> Result<bson::Document> {
    match value {
        Value::Object(map) => map_to_document(map),
        other => Err(Error::Encoding(format!("expected a JSON object, got {}", other))),
    }
}

/// ObjectIds as bare hex, anything else in its display form
pub(crate) fn id_to_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;
    use serde_json::json;

    #[test]
    fn test_small_integers_become_int32() {
        let doc = json_to_document(json!({ "a": 1, "b": 5_000_000_000i64, "c": 1.5 })).unwrap();
        assert_eq!(doc.get("a"), Some(&Bson::Int32(1)));
        assert_eq!(doc.get("b"), Some(&Bson::Int64(5_000_000_000)));
        assert_eq!(doc.get("c"), Some(&Bson::Double(1.5)));
    }

    #[test]
    fn test_unsigned_overflow_is_rejected() {
        let err = json_to_document(json!({ "n": u64::MAX })).unwrap_err();
        assert!(matches!(err, Error::Encoding(ref msg) if msg.contains("'n'")));

        let err = json_to_document(json!({ "a": { "b": [1, u64::MAX] } })).unwrap_err();
        assert!(matches!(err, Error::Encoding(ref msg) if msg.contains("'a.b.1'")));

        let doc = json_to_document(json!({ "n": i64::MAX as u64 })).unwrap();
        assert_eq!(doc.get("n"), Some(&Bson::Int64(i64::MAX)));
    }

    #[test]
    fn test_validator_keys_survive_conversion() {
        let command = ValidatorCommand::new(json!({
            "$jsonSchema": {
                "bsonType": "object",
                "properties": { "email": { "bsonType": "string", "pattern": "^.+@.+$" } }
            }
        }));
        let doc = json_to_document(command.to_command("people")).unwrap();

        assert_eq!(doc.get_str("collMod").unwrap(), "people");
        assert_eq!(doc.get_str("validationLevel").unwrap(), "strict");
        let validator = doc.get_document("validator").unwrap();
        assert!(validator.get_document("$jsonSchema").is_ok());
    }

    #[test]
    fn test_id_formatting() {
        let oid = ObjectId::new();
        assert_eq!(id_to_string(&Bson::ObjectId(oid)), oid.to_hex());
        assert_eq!(id_to_string(&Bson::String("abc".into())), "abc");
        assert_eq!(id_to_string(&Bson::Int32(7)), "7");
    }
}

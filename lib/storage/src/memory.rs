// In-process document store for exercising the pipelines without a server
use crate::store::{DocumentStore, ValidatorCommand};
use mongodb::bson::oid::ObjectId;
use mongoschema_core::{Document, Error, Result};
use parking_lot::Mutex;

#[derive(Default)]
struct MemoryState {
    exists: bool,
    created_count: usize,
    validator: Option<ValidatorCommand>,
    documents: Vec<(String, Document)>,
    insert_failure: Option<String>,
    command_failure: Option<String>,
}

/// Mirrors the bits of server behaviour the pipelines depend on: `collMod`
/// fails on a missing collection and inserts hand out ObjectIds. Documents are
/// never validated.
pub struct InMemoryStore {
    collection_name: String,
    state: Mutex<MemoryState>,
}

impl InMemoryStore {
    pub fn new(collection_name: impl Into<String>) -> Self {
        Self {
            collection_name: collection_name.into(),
            state: Mutex::new(MemoryState::default()),
        }
    }

    /// Start with the collection already present
    pub fn with_existing_collection(self) -> Self {
        self.state.lock().exists = true;
        self
    }

    /// Make every subsequent insert fail with `message`
    pub fn fail_inserts(&self, message: impl Into<String>) {
        self.state.lock().insert_failure = Some(message.into());
    }

    /// Make every subsequent create or `collMod` fail with `message`
    pub fn fail_commands(&self, message: impl Into<String>) {
        self.state.lock().command_failure = Some(message.into());
    }

    pub fn exists(&self) -> bool {
        self.state.lock().exists
    }

    /// How many times `create_collection` ran
    pub fn created_count(&self) -> usize {
        self.state.lock().created_count
    }

    pub fn validator(&self) -> Option<ValidatorCommand> {
        self.state.lock().validator.clone()
    }

    pub fn documents(&self) -> Vec<Document> {
        self.state.lock().documents.iter().map(|(_, doc)| doc.clone()).collect()
    }

    pub fn ids(&self) -> Vec<String> {
        self.state.lock().documents.iter().map(|(id, _)| id.clone()).collect()
    }
}

impl DocumentStore for InMemoryStore {
    fn collection_name(&self) -> &str {
        &self.collection_name
    }

    async fn collection_exists(&self) -> Result<bool> {
        Ok(self.exists())
    }

    async fn create_collection(&self) -> Result<()> {
        let mut state = self.state.lock();
        if let Some(message) = &state.command_failure {
            return Err(Error::StoreCommand(message.clone()));
        }
        if state.exists {
            return Err(Error::StoreCommand(format!(
                "Collection already exists: {}",
                self.collection_name
            )));
        }
        state.exists = true;
        state.created_count += 1;
        Ok(())
    }

    async fn apply_validator(&self, command: &ValidatorCommand) -> Result<()> {
        let mut state = self.state.lock();
        if let Some(message) = &state.command_failure {
            return Err(Error::StoreCommand(message.clone()));
        }
        if !state.exists {
            return Err(Error::StoreCommand(format!(
                "ns does not exist: {}",
                self.collection_name
            )));
        }
        state.validator = Some(command.clone());
        Ok(())
    }

    async fn insert_one(&self, document: Document) -> Result<String> {
        let mut ids = self.insert_many(vec![document]).await?;
        ids.pop().ok_or_else(|| Error::Insertion("no id generated".to_string()))
    }

    async fn insert_many(&self, documents: Vec<Document>) -> Result<Vec<String>> {
        let mut state = self.state.lock();
        if let Some(message) = &state.insert_failure {
            return Err(Error::Insertion(message.clone()));
        }
        // Inserting implicitly creates the collection, as on a real server.
        state.exists = true;
        let mut ids = Vec::with_capacity(documents.len());
        for document in documents {
            let id = ObjectId::new().to_hex();
            ids.push(id.clone());
            state.documents.push((id, document));
        }
        Ok(ids)
    }
}

//! Schema application pipeline
//!
//! fetch → translate → structural check → ensure collection → `collMod`.
//! Any failing step stops the run; nothing is retried and nothing is rolled
//! back.

use crate::fetch::SchemaFetcher;
use crate::store::{DocumentStore, ValidationAction, ValidationLevel, ValidatorCommand};
use mongoschema_core::{build_validator, MongoValidator, Result, Strictness, TranslationWarning};
use tracing::{error, info, warn};

/// Knobs for a schema application run
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplyOptions {
    pub strictness: Strictness,
    pub level: ValidationLevel,
    pub action: ValidationAction,
}

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct ApplyReport {
    pub collection: String,
    pub created_collection: bool,
    pub level: ValidationLevel,
    pub action: ValidationAction,
    pub warnings: Vec<TranslationWarning>,
}

pub struct SchemaApplier<'a, S: DocumentStore> {
    store: &'a S,
    fetcher: SchemaFetcher,
    options: ApplyOptions,
}

impl<'a, S: DocumentStore> SchemaApplier<'a, S> {
    pub fn new(store: &'a S, options: ApplyOptions) -> Self {
        Self::with_fetcher(store, SchemaFetcher::new(), options)
    }

    pub fn with_fetcher(store: &'a S, fetcher: SchemaFetcher, options: ApplyOptions) -> Self {
        Self {
            store,
            fetcher,
            options,
        }
    }

    /// Fetch, translate and check without touching the store
    pub async fn prepare(&self, schema_url: &str) -> Result<MongoValidator> {
        let schema = self.fetcher.fetch(schema_url).await?;
        let validator = build_validator(schema)?;
        for warning in validator.warnings() {
            warn!("{}", warning);
        }
        validator.check(self.options.strictness).map_err(|e| {
            error!("{}", e);
            e
        })?;
        Ok(validator)
    }

    /// Full pipeline against `schema_url`
    pub async fn apply(&self, schema_url: &str) -> Result<ApplyReport> {
        let validator = self.prepare(schema_url).await?;
        self.install(validator).await
    }

    /// Install an already prepared validator on the store's collection
    pub async fn install(&self, validator: MongoValidator) -> Result<ApplyReport> {
        let collection = self.store.collection_name().to_string();

        let created_collection = if self.store.collection_exists().await? {
            false
        } else {
            info!("Creating collection '{}'", collection);
            self.store.create_collection().await.map_err(|e| {
                error!("Error creating collection '{}': {}", collection, e);
                e
            })?;
            true
        };

        let warnings = validator.warnings().to_vec();
        let command = ValidatorCommand {
            validator: validator.into_document(),
            level: self.options.level,
            action: self.options.action,
        };
        self.store.apply_validator(&command).await.map_err(|e| {
            error!("Error applying schema to MongoDB: {}", e);
            e
        })?;
        info!(
            "Applied validator to '{}' (validationLevel={}, validationAction={})",
            collection, command.level, command.action
        );

        Ok(ApplyReport {
            collection,
            created_collection,
            level: command.level,
            action: command.action,
            warnings,
        })
    }
}

use mongoschema_core::{Error, Result};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

pub const MONGO_URI_VAR: &str = "MONGO_URI";
pub const DB_NAME_VAR: &str = "DB_NAME";
pub const COLLECTION_NAME_VAR: &str = "COLLECTION_NAME";
pub const SCHEMA_URL_VAR: &str = "SCHEMA_URL";

/// Where the tools connect and what they operate on
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub mongo_uri: String,
    pub database: String,
    pub collection: String,
    /// Only the schema applier needs this
    pub schema_url: Option<String>,
}

impl ConnectionConfig {
    pub fn new(
        mongo_uri: impl Into<String>,
        database: impl Into<String>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            mongo_uri: mongo_uri.into(),
            database: database.into(),
            collection: collection.into(),
            schema_url: None,
        }
    }

    pub fn with_schema_url(mut self, url: impl Into<String>) -> Self {
        self.schema_url = Some(url.into());
        self
    }

    /// Read `MONGO_URI`, `DB_NAME`, `COLLECTION_NAME` and the optional
    /// `SCHEMA_URL` from the process environment, falling back to a `.env`
    /// file in the working directory or one of its parents
    pub fn from_env() -> Result<Self> {
        let file = match dotenvy::dotenv_iter() {
            Ok(iter) => collect_pairs(iter)?,
            Err(e) if e.not_found() => HashMap::new(),
            Err(e) => return Err(Error::InvalidConfig(e.to_string())),
        };
        Self::from_env_and(file)
    }

    /// Like [`from_env`](Self::from_env) with an explicit `.env`-style file.
    /// Variables already set in the process take precedence.
    pub fn from_env_file(path: &Path) -> Result<Self> {
        let iter = dotenvy::from_path_iter(path).map_err(|e| {
            Error::InvalidConfig(format!("{}: {}", path.display(), e))
        })?;
        debug!("Loading configuration from {}", path.display());
        Self::from_env_and(collect_pairs(iter)?)
    }

    fn from_env_and(file: HashMap<String, String>) -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok().or_else(|| file.get(key).cloned()))
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary source.
    /// Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| get(key).ok_or_else(|| Error::MissingConfig(key.to_string()));

        Ok(Self {
            mongo_uri: require(MONGO_URI_VAR)?,
            database: require(DB_NAME_VAR)?,
            collection: require(COLLECTION_NAME_VAR)?,
            schema_url: get(SCHEMA_URL_VAR),
        })
    }

    pub fn schema_url(&self) -> Result<&str> {
        self.schema_url
            .as_deref()
            .ok_or_else(|| Error::MissingConfig(SCHEMA_URL_VAR.to_string()))
    }
}

fn collect_pairs<R: std::io::Read>(iter: dotenvy::Iter<R>) -> Result<HashMap<String, String>> {
    iter.map(|item| item.map_err(|e| Error::InvalidConfig(e.to_string())))
        .collect()
}

// Connection strings carry credentials; keep them out of logs.
impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("mongo_uri", &"<redacted>")
            .field("database", &self.database)
            .field("collection", &self.collection)
            .field("schema_url", &self.schema_url)
            .finish()
    }
}

//! Runtime configuration for the MongoDB record store.

use crate::errors::StoreError;

/// Connection settings for the primary record store.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// MongoDB connection string, e.g. `mongodb://localhost:27017`.
    pub uri: String,
    /// Database name.
    pub database: String,
    /// Collection holding podcast summary records.
    pub collection: String,
}

impl StoreConfig {
    /// Loads the config from environment variables.
    ///
    /// - `MONGODB_URI` (required)
    /// - `MONGODB_DATABASE` (default `podcast_agent_results`)
    /// - `MONGODB_COLLECTION` (default `podcast_summaries`)
    ///
    /// # Errors
    /// Returns [`StoreError::Config`] if `MONGODB_URI` is missing or empty.
    pub fn from_env() -> Result<Self, StoreError> {
        let uri = std::env::var("MONGODB_URI")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| StoreError::Config("MONGODB_URI is not set".into()))?;

        let database = env_or("MONGODB_DATABASE", "podcast_agent_results");
        let collection = env_or("MONGODB_COLLECTION", "podcast_summaries");

        let cfg = Self {
            uri,
            database,
            collection,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.uri.trim().is_empty() {
            return Err(StoreError::Config("uri is empty".into()));
        }
        if self.database.trim().is_empty() {
            return Err(StoreError::Config("database is empty".into()));
        }
        if self.collection.trim().is_empty() {
            return Err(StoreError::Config("collection is empty".into()));
        }
        Ok(())
    }
}

fn env_or(name: &str, default: &str) -> String {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => default.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_empty_fields() {
        let cfg = StoreConfig {
            uri: "".into(),
            database: "db".into(),
            collection: "coll".into(),
        };
        assert!(cfg.validate().is_err());

        let cfg = StoreConfig {
            uri: "mongodb://localhost:27017".into(),
            database: " ".into(),
            collection: "coll".into(),
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_accepts_complete_config() {
        let cfg = StoreConfig {
            uri: "mongodb://localhost:27017".into(),
            database: "podcast_agent_results".into(),
            collection: "podcast_summaries".into(),
        };
        assert!(cfg.validate().is_ok());
    }
}

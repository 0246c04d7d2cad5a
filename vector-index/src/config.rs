//! Runtime and collection configuration.

use crate::errors::IndexError;

/// Distance function used for the vector space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DistanceKind {
    /// Cosine distance (recommended for most embeddings).
    Cosine,
    /// Dot product (useful for normalized vectors).
    Dot,
    /// Euclidean distance (L2).
    Euclid,
}

impl DistanceKind {
    /// Parses a distance name, case-insensitively.
    pub fn parse(raw: &str) -> Result<Self, IndexError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "cosine" => Ok(Self::Cosine),
            "dot" => Ok(Self::Dot),
            "euclid" | "euclidean" => Ok(Self::Euclid),
            other => Err(IndexError::Config(format!(
                "unsupported distance '{other}' (expected cosine, dot or euclid)"
            ))),
        }
    }
}

/// Configuration for the podcast summary index.
#[derive(Clone, Debug)]
pub struct IndexConfig {
    /// Qdrant endpoint, e.g. `http://localhost:6334`.
    pub url: String,
    /// Optional API key for Qdrant Cloud.
    pub api_key: Option<String>,
    /// Target collection name.
    pub collection: String,
    /// Logical namespace written into every payload and matched at query time.
    pub namespace: String,
    /// Distance function (Cosine by default).
    pub distance: DistanceKind,
    /// Dimensionality of stored vectors.
    pub dim: usize,
}

impl IndexConfig {
    pub const DEFAULT_URL: &'static str = "http://localhost:6334";
    pub const DEFAULT_COLLECTION: &'static str = "podcast-summaries";
    pub const DEFAULT_NAMESPACE: &'static str = "summaries";
    /// Width of `text-embedding-3-large` vectors.
    pub const DEFAULT_DIM: usize = 3072;

    /// Reads the configuration from `QDRANT_*` / `EMBEDDING_DIM` variables,
    /// falling back to local-development defaults.
    ///
    /// # Errors
    /// Returns `IndexError::Config` when a set variable cannot be parsed or
    /// the resulting configuration fails [`IndexConfig::validate`].
    pub fn from_env() -> Result<Self, IndexError> {
        let distance = match std::env::var("QDRANT_DISTANCE") {
            Ok(raw) => DistanceKind::parse(&raw)?,
            Err(_) => DistanceKind::Cosine,
        };
        let dim = match std::env::var("EMBEDDING_DIM") {
            Ok(raw) => raw.trim().parse::<usize>().map_err(|_| {
                IndexError::Config(format!("EMBEDDING_DIM must be a positive integer, got '{raw}'"))
            })?,
            Err(_) => Self::DEFAULT_DIM,
        };

        let cfg = Self {
            url: env_or("QDRANT_URL", Self::DEFAULT_URL),
            api_key: std::env::var("QDRANT_API_KEY")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            collection: env_or("QDRANT_COLLECTION", Self::DEFAULT_COLLECTION),
            namespace: env_or("QDRANT_NAMESPACE", Self::DEFAULT_NAMESPACE),
            distance,
            dim,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), IndexError> {
        if self.url.trim().is_empty() {
            return Err(IndexError::Config("url is empty".into()));
        }
        if self.collection.trim().is_empty() {
            return Err(IndexError::Config("collection is empty".into()));
        }
        if self.namespace.trim().is_empty() {
            return Err(IndexError::Config("namespace is empty".into()));
        }
        if self.dim == 0 {
            return Err(IndexError::Config("dim must be > 0".into()));
        }
        Ok(())
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

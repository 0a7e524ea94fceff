//! Error types for the map clustering library.

use crate::index::ClusterId;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MapaError>;

#[derive(Debug, Error)]
pub enum MapaError {
    /// A record or coordinate could not be used.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Clustering, marker or view settings are inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The id does not name a cluster of this index.
    #[error("no cluster with id {0}")]
    ClusterNotFound(ClusterId),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[cfg(feature = "toml")]
    #[error("toml error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[cfg(feature = "toml")]
    #[error("toml error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

use crate::error::DocweaveError;
use serde::{Deserialize, Serialize};
use std::{fs::read_to_string, path::Path};

/// Default bound on the number of identities a single top-level resolution may have in flight.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Settings for [`crate::resolve::DocCache`].
///
/// Loaded from TOML, either standalone or as the `[resolver]` table of a catalog file:
///
/// ```toml
/// max_depth = 32
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Maximum inheritance/reference nesting before resolution fails with
    /// [`DocweaveError::ResolutionDepthExceeded`].
    pub max_depth: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ResolverConfig {
    pub fn with_max_depth(max_depth: usize) -> Self {
        ResolverConfig { max_depth }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, DocweaveError> {
        let config: ResolverConfig = toml::from_str(content)?;
        if config.max_depth == 0 {
            return Err(DocweaveError::Serialization(
                "max_depth must be at least 1".to_string(),
            ));
        }
        Ok(config)
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DocweaveError> {
        let path = path.as_ref();
        tracing::debug!("Attempting to read resolver config from: {:?}", path);
        if !path.exists() {
            tracing::debug!("Config file not found, using default resolver config.");
            return Ok(ResolverConfig::default());
        }
        let content = read_to_string(path)?;
        ResolverConfig::from_toml_str(&content)
    }
}

use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identity::DocKey;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
pub enum DocweaveError {
    #[error("Circular documentation reference at {key}. Resolution chain: {}", display_chain(.chain))]
    CircularReference { key: DocKey, chain: Vec<DocKey> },
    #[error("Documentation resolution exceeded depth {depth} at {key}")]
    ResolutionDepthExceeded { key: DocKey, depth: usize },
    #[error("Documentation codec error: {0}")]
    Codec(String),
    #[error("File System error: {0}")]
    Io(String),
    #[error("Item Not Found: {0}")]
    NotFound(String),
    #[error("You do not have permission to access this resource")]
    PermissionDenied,
    #[error("(De)Serialization error: {0}")]
    Serialization(String),
}

impl DocweaveError {
    /// Errors raised by the recursion guard, as opposed to collaborator or I/O failures.
    pub fn is_resolution_failure(&self) -> bool {
        matches!(
            self,
            DocweaveError::CircularReference { .. } | DocweaveError::ResolutionDepthExceeded { .. }
        )
    }
}

fn display_chain(chain: &[DocKey]) -> String {
    chain
        .iter()
        .map(|key| key.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

impl From<toml::de::Error> for DocweaveError {
    fn from(src: toml::de::Error) -> DocweaveError {
        DocweaveError::Serialization(format!("Toml deserialization error: {src}"))
    }
}

impl From<io::Error> for DocweaveError {
    fn from(x: io::Error) -> Self {
        match x.kind() {
            io::ErrorKind::NotFound => DocweaveError::NotFound(format!("{x}")),
            io::ErrorKind::PermissionDenied => DocweaveError::PermissionDenied,
            _ => DocweaveError::Io(format!("IOError: {}", x.kind())),
        }
    }
}

//! Registration error types

use registrar_resolver::ResolveError;
use registrar_types::EntityKind;
use thiserror::Error;

/// Registration errors
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("A different {kind} is already registered as {name} version {version} in {project}/{domain}")]
    Conflict {
        kind: EntityKind,
        project: String,
        domain: String,
        name: String,
        version: String,
    },

    #[error("Invalid registry path component: '{0}'")]
    InvalidName(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for registration operations
pub type RegistrationResult<T> = std::result::Result<T, RegistrationError>;

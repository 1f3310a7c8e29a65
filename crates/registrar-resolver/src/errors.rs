//! Error types for resolution

use registrar_types::EntityError;

/// Errors that abort scanning or ordering.
///
/// None of these are transient: the caller has to fix the packages or the
/// options and run again. No partial order is ever returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("Failed to load module '{module}': {reason}")]
    PackageLoad { module: String, reason: String },

    #[error("Include and exclude kind filters cannot both be set")]
    FilterConflict,

    #[error(
        "A cyclical dependency was detected while ordering entities. Cycle path was: {}",
        .path.join(" -> ")
    )]
    CycleDetected { path: Vec<String> },

    #[error(
        "An entity was not found in the modules of the configured packages. \
         Move the {description} into a configured package, or adjust the configuration"
    )]
    UndefinedEntity { description: String },

    #[error(transparent)]
    Entity(#[from] EntityError),
}

impl ResolveError {
    pub(crate) fn load(module: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::PackageLoad {
            module: module.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for resolution
pub type ResolveResult<T> = Result<T, ResolveError>;

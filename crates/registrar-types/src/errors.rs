//! Error types for the entity model

use crate::{EntityId, EntityKind};

/// Errors raised by [`EntityStore`](crate::EntityStore) operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntityError {
    #[error("Entity not found: {0}")]
    UnknownEntity(EntityId),

    #[error("Only workflows can create a default launch plan, {id} is a {kind}")]
    NotAWorkflow { id: EntityId, kind: EntityKind },
}

/// Result type alias for entity operations
pub type EntityResult<T> = Result<T, EntityError>;

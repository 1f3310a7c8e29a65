//! Entities and their arena handles

use crate::EntityKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable handle of an entity inside an [`EntityStore`](crate::EntityStore)
///
/// Handles are assigned in construction order and never reused, so they
/// stand in for object identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity:{}", self.0)
    }
}

/// A task, workflow or launch plan definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// What kind of definition this is
    pub kind: EntityKind,

    /// Entities that must be registered before this one.
    /// Set semantics; insertion order is kept so traversal is deterministic.
    pub upstream: Vec<EntityId>,

    /// Dotted path of the module this entity was constructed in
    pub instantiated_in: Option<String>,

    /// Opaque definition payload handed to the registry
    #[serde(default)]
    pub spec: serde_json::Value,
}

impl Entity {
    pub fn new(kind: EntityKind, instantiated_in: Option<String>) -> Self {
        Self {
            kind,
            upstream: Vec::new(),
            instantiated_in,
            spec: serde_json::Value::Null,
        }
    }

    pub fn with_spec(mut self, spec: serde_json::Value) -> Self {
        self.spec = spec;
        self
    }

    pub fn is_workflow(&self) -> bool {
        self.kind == EntityKind::Workflow
    }

    /// Whether this entity was constructed in the given module
    pub fn defined_in(&self, module: &str) -> bool {
        self.instantiated_in.as_deref() == Some(module)
    }
}

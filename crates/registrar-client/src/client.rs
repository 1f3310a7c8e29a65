//! Registry client trait
//!
//! A `RegistryClient` stores entity definitions under
//! `(kind, project, domain, name, version)`.

use crate::error::RegistrationResult;
use crate::snapshot::{EntitySnapshot, RegistrationTarget};
use async_trait::async_trait;
use registrar_types::EntityKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a registration call did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationOutcome {
    /// Newly registered
    Created,
    /// Identical content was already registered
    AlreadyExists,
    /// Not submitted (dry run)
    Skipped,
}

impl fmt::Display for RegistrationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationOutcome::Created => write!(f, "created"),
            RegistrationOutcome::AlreadyExists => write!(f, "already exists"),
            RegistrationOutcome::Skipped => write!(f, "skipped"),
        }
    }
}

/// Registry for entity definitions
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// Register an entity.
    ///
    /// Registering content identical to what is stored is a no-op
    /// success; different content under the same key is a conflict.
    async fn register(
        &self,
        target: &RegistrationTarget,
        entity: &EntitySnapshot,
    ) -> RegistrationResult<RegistrationOutcome>;

    /// Fetch a registered entity
    async fn get(
        &self,
        target: &RegistrationTarget,
        kind: EntityKind,
        name: &str,
    ) -> RegistrationResult<Option<EntitySnapshot>>;
}

//! In-memory registry client
//!
//! Suitable for development and testing.

use crate::client::{RegistrationOutcome, RegistryClient};
use crate::error::{RegistrationError, RegistrationResult};
use crate::snapshot::{EntitySnapshot, RegistrationTarget};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use registrar_types::EntityKind;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RegistryKey {
    kind: EntityKind,
    project: String,
    domain: String,
    name: String,
    version: String,
}

impl RegistryKey {
    fn new(target: &RegistrationTarget, kind: EntityKind, name: &str) -> Self {
        Self {
            kind,
            project: target.project.clone(),
            domain: target.domain.clone(),
            name: name.to_string(),
            version: target.version.clone(),
        }
    }
}

/// In-memory registry
#[derive(Debug)]
pub struct InMemoryRegistryClient {
    entries: DashMap<RegistryKey, EntitySnapshot>,
}

impl InMemoryRegistryClient {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for InMemoryRegistryClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RegistryClient for InMemoryRegistryClient {
    async fn register(
        &self,
        target: &RegistrationTarget,
        entity: &EntitySnapshot,
    ) -> RegistrationResult<RegistrationOutcome> {
        let key = RegistryKey::new(target, entity.kind, &entity.name);

        match self.entries.entry(key) {
            Entry::Occupied(existing) if existing.get() == entity => {
                Ok(RegistrationOutcome::AlreadyExists)
            }
            Entry::Occupied(_) => Err(RegistrationError::Conflict {
                kind: entity.kind,
                project: target.project.clone(),
                domain: target.domain.clone(),
                name: entity.name.clone(),
                version: target.version.clone(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(entity.clone());
                Ok(RegistrationOutcome::Created)
            }
        }
    }

    async fn get(
        &self,
        target: &RegistrationTarget,
        kind: EntityKind,
        name: &str,
    ) -> RegistrationResult<Option<EntitySnapshot>> {
        let key = RegistryKey::new(target, kind, name);
        Ok(self.entries.get(&key).map(|e| e.clone()))
    }
}

//! Entity arena
//!
//! Every entity registers itself here when it is constructed. The store
//! hands out [`EntityId`]s that the rest of the system uses as node keys.

use crate::{Entity, EntityError, EntityId, EntityKind, EntityResult};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_STORE: AtomicU64 = AtomicU64::new(1);

/// Identity of one [`EntityStore`]. [`EntityId`]s are only meaningful in
/// the store that issued them; caches of ids key on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StoreId(u64);

impl StoreId {
    fn next() -> Self {
        StoreId(NEXT_STORE.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "store:{}", self.0)
    }
}

/// Process-scoped arena of constructed entities
#[derive(Debug)]
pub struct EntityStore {
    id: StoreId,
    entities: Vec<Entity>,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self {
            id: StoreId::next(),
            entities: Vec::new(),
        }
    }
}

/// A clone is a new store: it starts with the same entities but grows
/// independently, so it gets its own identity.
impl Clone for EntityStore {
    fn clone(&self) -> Self {
        Self {
            id: StoreId::next(),
            entities: self.entities.clone(),
        }
    }
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> StoreId {
        self.id
    }

    /// Construct an entity with an empty spec
    pub fn define(&mut self, kind: EntityKind, instantiated_in: Option<&str>) -> EntityId {
        self.insert(Entity::new(kind, instantiated_in.map(str::to_string)))
    }

    /// Construct an entity carrying a registry payload
    pub fn define_with_spec(
        &mut self,
        kind: EntityKind,
        instantiated_in: Option<&str>,
        spec: serde_json::Value,
    ) -> EntityId {
        self.insert(Entity::new(kind, instantiated_in.map(str::to_string)).with_spec(spec))
    }

    /// Add an already constructed entity to the arena
    pub fn insert(&mut self, entity: Entity) -> EntityId {
        let id = EntityId::from_index(self.entities.len());
        self.entities.push(entity);
        id
    }

    /// Record that `id` depends on `dependency`. Adding an existing edge is a no-op.
    pub fn add_upstream(&mut self, id: EntityId, dependency: EntityId) -> EntityResult<()> {
        self.entity(dependency)?;
        let entity = self
            .entities
            .get_mut(id.index())
            .ok_or(EntityError::UnknownEntity(id))?;
        if !entity.upstream.contains(&dependency) {
            entity.upstream.push(dependency);
        }
        Ok(())
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.index())
    }

    pub fn entity(&self, id: EntityId) -> EntityResult<&Entity> {
        self.get(id).ok_or(EntityError::UnknownEntity(id))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterate all entities in construction order
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities
            .iter()
            .enumerate()
            .map(|(i, e)| (EntityId::from_index(i), e))
    }

    /// Produce the default launch plan of a workflow.
    ///
    /// The plan is a new entity constructed in the workflow's module whose
    /// only upstream dependency is the workflow. Each call creates a new plan.
    pub fn create_default_launch_plan(&mut self, workflow: EntityId) -> EntityResult<EntityId> {
        let source = self.entity(workflow)?;
        if !source.is_workflow() {
            return Err(EntityError::NotAWorkflow {
                id: workflow,
                kind: source.kind,
            });
        }

        let mut plan = Entity::new(EntityKind::LaunchPlan, source.instantiated_in.clone())
            .with_spec(serde_json::json!({ "default": true }));
        plan.upstream.push(workflow);
        Ok(self.insert(plan))
    }

    /// Best-effort human readable description, used in diagnostics
    pub fn describe(&self, id: EntityId) -> String {
        match self.get(id) {
            Some(Entity {
                kind,
                instantiated_in: Some(module),
                ..
            }) => format!("{} defined in {}", kind, module),
            Some(entity) => format!("{} of unknown origin", entity.kind),
            None => format!("<unknown {}>", id),
        }
    }
}

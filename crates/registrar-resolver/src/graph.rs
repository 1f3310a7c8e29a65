//! Module map: which entities are defined where
//!
//! The map admits an entity only from the module it was constructed in,
//! so an entity imported into other modules is registered once, under its
//! defining name. An import alias inside the defining module never takes
//! precedence over a direct binding. Every admitted workflow brings a default launch plan
//! along, bound under the workflow's name.

use crate::errors::ResolveResult;
use crate::module::Module;
use registrar_types::{EntityId, EntityStore};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, trace};

/// Where an entity is bound: module path and symbol name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Binding {
    pub module: String,
    pub symbol: String,
}

impl Binding {
    pub fn new(module: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            symbol: symbol.into(),
        }
    }

    /// `module.symbol`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.module, self.symbol)
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.module, self.symbol)
    }
}

/// Ordered mapping from entity to its binding, in discovery order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleMap {
    order: Vec<EntityId>,
    bindings: HashMap<EntityId, Binding>,
}

impl ModuleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the map from scanned modules, synthesizing default launch plans.
    pub fn build(modules: &[Module], store: &mut EntityStore) -> ResolveResult<Self> {
        let mut map = Self::new();

        for module in modules {
            // Direct bindings first, so an entity re-exported from its own
            // module keeps its defining name
            let (direct, imported): (Vec<_>, Vec<_>) = module
                .entities()
                .partition(|(symbol, _)| !module.is_imported(symbol));

            for (symbol, id) in direct.into_iter().chain(imported) {
                let entity = store.entity(id)?;
                if !entity.defined_in(&module.path) {
                    trace!(
                        module = %module.path,
                        symbol = %symbol,
                        defined_in = ?entity.instantiated_in,
                        "Skipping imported entity"
                    );
                    continue;
                }
                let is_workflow = entity.is_workflow();

                let binding = Binding::new(module.path.as_str(), symbol);
                if !map.insert(id, binding.clone()) {
                    debug!(
                        alias = %binding,
                        bound_as = ?map.get(id).map(Binding::qualified_name),
                        "Entity already bound, ignoring alias"
                    );
                    continue;
                }

                if is_workflow {
                    let plan = store.create_default_launch_plan(id)?;
                    debug!(workflow = %binding, launch_plan = %plan, "Default launch plan created");
                    map.insert(plan, binding);
                }
            }
        }

        debug!(entities = map.len(), "Module map built");
        Ok(map)
    }

    /// Bind an entity. Returns false, leaving the map unchanged, when the
    /// entity is already bound.
    pub fn insert(&mut self, id: EntityId, binding: Binding) -> bool {
        if self.bindings.contains_key(&id) {
            return false;
        }
        self.order.push(id);
        self.bindings.insert(id, binding);
        true
    }

    pub fn get(&self, id: EntityId) -> Option<&Binding> {
        self.bindings.get(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.bindings.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Entity ids in discovery order
    pub fn ids(&self) -> &[EntityId] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Binding)> {
        self.order
            .iter()
            .filter_map(move |id| self.bindings.get(id).map(|b| (*id, b)))
    }

    /// Readable name for diagnostics: the qualified name when bound,
    /// otherwise the store's description.
    pub fn label(&self, id: EntityId, store: &EntityStore) -> String {
        match self.get(id) {
            Some(binding) => binding.qualified_name(),
            None => store.describe(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::Value;
    use registrar_types::EntityKind;

    #[test]
    fn test_only_local_definitions_are_admitted() {
        let mut store = EntityStore::new();
        let local = store.define(EntityKind::Task, Some("app.tasks"));
        let foreign = store.define(EntityKind::Task, Some("lib.tasks"));
        let modules = vec![Module::new("app.tasks")
            .bind("local", Value::Entity(local))
            .bind("reexported", Value::Entity(foreign))
            .bind("limit", Value::Other("3".into()))];

        let map = ModuleMap::build(&modules, &mut store).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(local), Some(&Binding::new("app.tasks", "local")));
        assert!(!map.contains(foreign));
    }

    #[test]
    fn test_workflow_gets_one_default_launch_plan() {
        let mut store = EntityStore::new();
        let wf = store.define(EntityKind::Workflow, Some("app.flows"));
        let modules = vec![Module::new("app.flows").bind("daily", Value::Entity(wf))];

        let map = ModuleMap::build(&modules, &mut store).unwrap();
        assert_eq!(map.len(), 2);

        let plans: Vec<EntityId> = map
            .ids()
            .iter()
            .copied()
            .filter(|id| store.get(*id).unwrap().kind == EntityKind::LaunchPlan)
            .collect();
        assert_eq!(plans.len(), 1);
        assert_eq!(store.get(plans[0]).unwrap().upstream, vec![wf]);
        assert_eq!(map.get(plans[0]), map.get(wf));
        assert_eq!(map.ids(), &[wf, plans[0]]);
    }

    #[test]
    fn test_alias_keeps_first_binding_and_one_launch_plan() {
        let mut store = EntityStore::new();
        let wf = store.define(EntityKind::Workflow, Some("app"));
        let modules = vec![Module::new("app")
            .bind("primary", Value::Entity(wf))
            .bind("secondary", Value::Entity(wf))];

        let map = ModuleMap::build(&modules, &mut store).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(wf).unwrap().symbol, "primary");
    }

    #[test]
    fn test_defining_name_wins_over_local_import_alias() {
        let mut store = EntityStore::new();
        let wf = store.define(EntityKind::Workflow, Some("app.flows"));
        let modules = vec![Module::new("app.flows")
            .import("a_alias", Value::Entity(wf))
            .bind("daily", Value::Entity(wf))];

        let map = ModuleMap::build(&modules, &mut store).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(wf), Some(&Binding::new("app.flows", "daily")));
        assert!(map
            .iter()
            .all(|(_, binding)| binding.qualified_name() == "app.flows.daily"));
    }

    #[test]
    fn test_unknown_entity_in_binding_fails() {
        let mut store = EntityStore::new();
        let mut other = EntityStore::new();
        other.define(EntityKind::Task, None);
        let stray = other.define(EntityKind::Task, None);
        let modules = vec![Module::new("app").bind("stray", Value::Entity(stray))];

        assert!(ModuleMap::build(&modules, &mut store).is_err());
    }

    #[test]
    fn test_label() {
        let mut store = EntityStore::new();
        let bound = store.define(EntityKind::Task, Some("app"));
        let loose = store.define(EntityKind::Task, Some("vendor"));
        let mut map = ModuleMap::new();
        map.insert(bound, Binding::new("app", "clean"));

        assert_eq!(map.label(bound, &store), "app.clean");
        assert_eq!(map.label(loose, &store), "task defined in vendor");
    }
}

//! Loaded module namespaces

use registrar_types::EntityId;
use std::collections::{BTreeMap, BTreeSet};

/// A value bound to a name in a module namespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A task, workflow or launch plan
    Entity(EntityId),
    /// Anything else (constants, helpers); ignored by the resolver
    Other(String),
}

impl Value {
    pub fn as_entity(&self) -> Option<EntityId> {
        match self {
            Value::Entity(id) => Some(*id),
            Value::Other(_) => None,
        }
    }
}

/// The namespace of one loaded module.
///
/// Bindings are kept sorted by symbol name, which is the order the
/// resolver visits them in. Names brought in by an import are recorded in
/// `imported`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub path: String,
    pub bindings: BTreeMap<String, Value>,
    pub imported: BTreeSet<String>,
}

impl Module {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            bindings: BTreeMap::new(),
            imported: BTreeSet::new(),
        }
    }

    /// Bind a value to a name, replacing any previous binding
    pub fn bind(mut self, symbol: impl Into<String>, value: Value) -> Self {
        let symbol = symbol.into();
        self.imported.remove(&symbol);
        self.bindings.insert(symbol, value);
        self
    }

    /// Bind a value brought in from elsewhere under a local name
    pub fn import(mut self, symbol: impl Into<String>, value: Value) -> Self {
        let symbol = symbol.into();
        self.bindings.insert(symbol.clone(), value);
        self.imported.insert(symbol);
        self
    }

    pub fn is_imported(&self, symbol: &str) -> bool {
        self.imported.contains(symbol)
    }

    pub fn get(&self, symbol: &str) -> Option<&Value> {
        self.bindings.get(symbol)
    }

    /// Iterate the entity bindings only
    pub fn entities(&self) -> impl Iterator<Item = (&str, EntityId)> {
        self.bindings
            .iter()
            .filter_map(|(name, value)| value.as_entity().map(|id| (name.as_str(), id)))
    }
}

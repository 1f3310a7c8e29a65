//! Resolver facade: scan, build the module map, and order

use crate::errors::ResolveResult;
use crate::filter::SortOptions;
use crate::graph::ModuleMap;
use crate::scanner::scan;
use crate::sort::{sort, Registrable, TopologicalSort};
use crate::source::ModuleSource;
use registrar_types::{EntityId, EntityStore};

/// The result of scanning a set of packages.
///
/// Owns the entity store and the module map; both are read-only once the
/// resolver exists, so the registration order can be computed any number
/// of times.
#[derive(Debug, Clone)]
pub struct Resolver {
    store: EntityStore,
    module_map: ModuleMap,
    modules: Vec<String>,
}

impl Resolver {
    /// Scan packages from a source that constructs its own entities
    pub fn scan<P, S>(packages: &[P], source: &mut S) -> ResolveResult<Self>
    where
        P: AsRef<str>,
        S: ModuleSource + ?Sized,
    {
        Self::scan_with_store(packages, source, EntityStore::new())
    }

    /// Scan packages whose entities (some or all) were constructed into `store` beforehand
    pub fn scan_with_store<P, S>(packages: &[P], source: &mut S, mut store: EntityStore) -> ResolveResult<Self>
    where
        P: AsRef<str>,
        S: ModuleSource + ?Sized,
    {
        let modules = scan(packages, source, &mut store)?;
        let module_map = ModuleMap::build(&modules, &mut store)?;
        Ok(Self {
            store,
            module_map,
            modules: modules.into_iter().map(|m| m.path).collect(),
        })
    }

    /// Lazily ordered entities; errors surface during iteration
    pub fn registration_order(&self, options: &SortOptions) -> ResolveResult<TopologicalSort<'_>> {
        sort(&self.module_map, &self.store, options)
    }

    /// The complete, validated order. Nothing is returned unless the whole
    /// graph orders cleanly.
    pub fn collect_order(&self, options: &SortOptions) -> ResolveResult<Vec<Registrable<'_>>> {
        self.registration_order(options)?.collect()
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn module_map(&self) -> &ModuleMap {
        &self.module_map
    }

    /// Paths of the scanned modules, in scan order
    pub fn modules(&self) -> &[String] {
        &self.modules
    }

    pub fn label(&self, id: EntityId) -> String {
        self.module_map.label(id, &self.store)
    }
}

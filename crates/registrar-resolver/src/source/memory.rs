//! In-memory module source

use super::{is_valid_path, ModuleSource};
use crate::errors::{ResolveError, ResolveResult};
use crate::module::Module;
use registrar_types::EntityStore;
use std::collections::{BTreeMap, BTreeSet};

/// Module namespaces assembled by the caller.
///
/// The entities bound in the modules must already live in the
/// [`EntityStore`] handed to the scanner. A package that has sub-modules
/// but was never inserted itself loads as an empty namespace.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    modules: BTreeMap<String, Module>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a module
    pub fn insert(&mut self, module: Module) {
        self.modules.insert(module.path.clone(), module);
    }

    pub fn with_module(mut self, module: Module) -> Self {
        self.insert(module);
        self
    }

    fn has_descendants(&self, path: &str) -> bool {
        let prefix = format!("{}.", path);
        self.modules.keys().any(|k| k.starts_with(&prefix))
    }
}

impl ModuleSource for InMemorySource {
    fn load(&mut self, path: &str, _store: &mut EntityStore) -> ResolveResult<Module> {
        if !is_valid_path(path) {
            return Err(ResolveError::load(path, "invalid module path"));
        }
        if let Some(module) = self.modules.get(path) {
            return Ok(module.clone());
        }
        if self.has_descendants(path) {
            return Ok(Module::new(path));
        }
        Err(ResolveError::load(path, format!("No module named '{}'", path)))
    }

    fn submodules(&self, path: &str) -> ResolveResult<Vec<String>> {
        let prefix = format!("{}.", path);
        let children: BTreeSet<String> = self
            .modules
            .keys()
            .filter_map(|k| k.strip_prefix(&prefix))
            .map(|rest| {
                let head = rest.split('.').next().unwrap_or(rest);
                format!("{}{}", prefix, head)
            })
            .collect();
        Ok(children.into_iter().collect())
    }
}

//! YAML manifest module source
//!
//! Packages are directories and modules are YAML files under a root
//! directory. Module `a.b` is `<root>/a/b.yaml`; package `a` is the
//! directory `<root>/a`, whose own namespace lives in `<root>/a/mod.yaml`
//! (optional).
//!
//! ```yaml
//! imports:
//!   normalize: common.tasks.normalize
//! values:
//!   retries: 3
//! entities:
//!   clean:   { kind: task, spec: { image: "repo/etl:v3" } }
//!   daily:   { kind: workflow, upstream: [clean, normalize] }
//!   nightly: { kind: launch_plan, upstream: [daily] }
//! ```
//!
//! An upstream reference is a plain name (looked up in the same module,
//! following imports), a dotted `module.symbol` path (the module is loaded
//! on demand), or an inline entity definition that is constructed in the
//! module but never bound to a name.

use super::{is_identifier, is_valid_path, ModuleSource};
use crate::errors::{ResolveError, ResolveResult};
use crate::module::{Module, Value};
use registrar_types::{EntityId, EntityKind, EntityStore, StoreId};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const PACKAGE_MANIFEST: &str = "mod.yaml";
const MANIFEST_EXTENSION: &str = "yaml";
const MAX_IMPORT_DEPTH: usize = 32;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    #[serde(default)]
    imports: BTreeMap<String, String>,
    #[serde(default)]
    values: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    entities: BTreeMap<String, EntityManifest>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct EntityManifest {
    kind: EntityKind,
    #[serde(default)]
    upstream: Vec<Reference>,
    #[serde(default)]
    spec: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Reference {
    Name(String),
    Inline(Box<EntityManifest>),
}

#[derive(Debug)]
struct ModuleRecord {
    imports: BTreeMap<String, String>,
    values: BTreeMap<String, serde_json::Value>,
    entities: BTreeMap<String, EntityId>,
    resolved_imports: BTreeMap<String, Value>,
}

impl ModuleRecord {
    fn namespace(&self, path: &str) -> Module {
        let mut module = Module::new(path);
        for (name, id) in &self.entities {
            module.bindings.insert(name.clone(), Value::Entity(*id));
        }
        for (name, value) in &self.values {
            module
                .bindings
                .insert(name.clone(), Value::Other(value.to_string()));
        }
        for (name, value) in &self.resolved_imports {
            module = module.import(name.clone(), value.clone());
        }
        module
    }
}

/// Loads module namespaces from YAML manifests under a root directory.
///
/// Each manifest is parsed at most once. Loading is two-phase: a module's
/// entities are constructed before any of its references are resolved, so
/// modules that refer to each other load fine. Reference cycles among
/// entities are left for the sorter to report.
///
/// Loaded modules hold ids of the store they were constructed in. Loading
/// into a different store starts over from the manifests.
#[derive(Debug)]
pub struct ManifestSource {
    root: PathBuf,
    modules: HashMap<String, ModuleRecord>,
    store: Option<StoreId>,
}

impl ManifestSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            modules: HashMap::new(),
            store: None,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn module_dir(&self, path: &str) -> PathBuf {
        path.split('.').fold(self.root.clone(), |dir, seg| dir.join(seg))
    }

    /// Find the manifest of a module. `Ok(None)` is a package without one.
    fn locate(&self, path: &str) -> ResolveResult<Option<PathBuf>> {
        let dir = self.module_dir(path);
        if dir.is_dir() {
            let manifest = dir.join(PACKAGE_MANIFEST);
            return Ok(manifest.is_file().then_some(manifest));
        }
        let file = dir.with_extension(MANIFEST_EXTENSION);
        if file.is_file() {
            return Ok(Some(file));
        }
        Err(ResolveError::load(
            path,
            format!("No module named '{}' under {}", path, self.root.display()),
        ))
    }

    fn read_manifest(path: &str, file: &Path) -> ResolveResult<Manifest> {
        let contents = fs::read_to_string(file)
            .map_err(|e| ResolveError::load(path, format!("{}: {}", file.display(), e)))?;
        if contents.trim().is_empty() {
            return Ok(Manifest::default());
        }
        serde_yaml::from_str(&contents)
            .map_err(|e| ResolveError::load(path, format!("{}: {}", file.display(), e)))
    }

    fn check_symbols(path: &str, manifest: &Manifest) -> ResolveResult<()> {
        let mut seen = HashSet::new();
        let names = manifest
            .imports
            .keys()
            .chain(manifest.values.keys())
            .chain(manifest.entities.keys());
        for name in names {
            if !is_identifier(name) {
                return Err(ResolveError::load(
                    path,
                    format!("'{}' is not a valid symbol name", name),
                ));
            }
            if !seen.insert(name) {
                return Err(ResolveError::load(
                    path,
                    format!("symbol '{}' is bound more than once", name),
                ));
            }
        }
        Ok(())
    }

    /// Make sure a module is loaded or being loaded
    fn ensure(&mut self, path: &str, store: &mut EntityStore) -> ResolveResult<()> {
        if self.store != Some(store.id()) {
            if !self.modules.is_empty() {
                debug!(store = %store.id(), cached = self.modules.len(), "New entity store, reloading manifests");
            }
            self.modules.clear();
            self.store = Some(store.id());
        }
        if self.modules.contains_key(path) {
            return Ok(());
        }
        if !is_valid_path(path) {
            return Err(ResolveError::load(path, "invalid module path"));
        }

        let manifest = match self.locate(path)? {
            Some(file) => Self::read_manifest(path, &file)?,
            None => Manifest::default(),
        };
        Self::check_symbols(path, &manifest)?;

        let entities: BTreeMap<String, EntityId> = manifest
            .entities
            .iter()
            .map(|(name, def)| {
                let id = store.define_with_spec(def.kind, Some(path), def.spec.clone());
                (name.clone(), id)
            })
            .collect();

        debug!(module = %path, entities = entities.len(), "Loaded module manifest");

        self.modules.insert(
            path.to_string(),
            ModuleRecord {
                imports: manifest.imports.clone(),
                values: manifest.values.clone(),
                entities: entities.clone(),
                resolved_imports: BTreeMap::new(),
            },
        );

        if let Err(e) = self.link_module(path, &manifest, &entities, store) {
            self.modules.remove(path);
            return Err(e);
        }
        Ok(())
    }

    fn link_module(
        &mut self,
        path: &str,
        manifest: &Manifest,
        entities: &BTreeMap<String, EntityId>,
        store: &mut EntityStore,
    ) -> ResolveResult<()> {
        for (name, def) in &manifest.entities {
            if let Some(&id) = entities.get(name) {
                self.link(path, id, &def.upstream, store)?;
            }
        }

        for (alias, target) in &manifest.imports {
            let value = self.lookup_reference(path, target, store, 0)?;
            if let Some(record) = self.modules.get_mut(path) {
                record.resolved_imports.insert(alias.clone(), value);
            }
        }
        Ok(())
    }

    fn link(
        &mut self,
        path: &str,
        id: EntityId,
        references: &[Reference],
        store: &mut EntityStore,
    ) -> ResolveResult<()> {
        for reference in references {
            let dependency = match reference {
                Reference::Name(name) => self.resolve_entity(path, name, store)?,
                Reference::Inline(def) => {
                    let inline = store.define_with_spec(def.kind, Some(path), def.spec.clone());
                    self.link(path, inline, &def.upstream, store)?;
                    inline
                }
            };
            store.add_upstream(id, dependency)?;
        }
        Ok(())
    }

    fn resolve_entity(
        &mut self,
        path: &str,
        reference: &str,
        store: &mut EntityStore,
    ) -> ResolveResult<EntityId> {
        match self.lookup_reference(path, reference, store, 0)? {
            Value::Entity(id) => Ok(id),
            Value::Other(_) => Err(ResolveError::load(
                path,
                format!("'{}' is not a task, workflow or launch plan", reference),
            )),
        }
    }

    /// Resolve a plain or dotted reference made from module `origin`
    fn lookup_reference(
        &mut self,
        origin: &str,
        reference: &str,
        store: &mut EntityStore,
        depth: usize,
    ) -> ResolveResult<Value> {
        match reference.rsplit_once('.') {
            Some((module, symbol)) => self.lookup(origin, module, symbol, store, depth),
            None => self.lookup(origin, origin, reference, store, depth),
        }
    }

    fn lookup(
        &mut self,
        origin: &str,
        module: &str,
        symbol: &str,
        store: &mut EntityStore,
        depth: usize,
    ) -> ResolveResult<Value> {
        if depth > MAX_IMPORT_DEPTH {
            return Err(ResolveError::load(
                origin,
                format!("import of '{}.{}' never resolves (import loop)", module, symbol),
            ));
        }
        self.ensure(module, store)?;

        let record = self
            .modules
            .get(module)
            .ok_or_else(|| ResolveError::load(module, "module is not loaded"))?;

        if let Some(&id) = record.entities.get(symbol) {
            return Ok(Value::Entity(id));
        }
        if let Some(value) = record.values.get(symbol) {
            return Ok(Value::Other(value.to_string()));
        }
        if let Some(value) = record.resolved_imports.get(symbol) {
            return Ok(value.clone());
        }
        if let Some(target) = record.imports.get(symbol).cloned() {
            return self.lookup_reference(module, &target, store, depth + 1);
        }

        Err(ResolveError::load(
            origin,
            format!("module '{}' has no attribute '{}'", module, symbol),
        ))
    }
}

impl ModuleSource for ManifestSource {
    fn load(&mut self, path: &str, store: &mut EntityStore) -> ResolveResult<Module> {
        self.ensure(path, store)?;
        self.modules
            .get(path)
            .map(|record| record.namespace(path))
            .ok_or_else(|| ResolveError::load(path, "module is not loaded"))
    }

    fn submodules(&self, path: &str) -> ResolveResult<Vec<String>> {
        let dir = self.module_dir(path);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let entries =
            fs::read_dir(&dir).map_err(|e| ResolveError::load(path, format!("{}: {}", dir.display(), e)))?;

        let mut children = BTreeSet::new();
        for entry in entries {
            let entry =
                entry.map_err(|e| ResolveError::load(path, format!("{}: {}", dir.display(), e)))?;
            let entry_path = entry.path();
            let child = if entry_path.is_dir() {
                entry_path.file_name().and_then(|n| n.to_str())
            } else if entry_path.extension().and_then(|e| e.to_str()) == Some(MANIFEST_EXTENSION)
                && entry_path.file_name().and_then(|n| n.to_str()) != Some(PACKAGE_MANIFEST)
            {
                entry_path.file_stem().and_then(|n| n.to_str())
            } else {
                None
            };

            if let Some(name) = child.filter(|n| is_identifier(n)) {
                children.insert(format!("{}.{}", path, name));
            }
        }
        Ok(children.into_iter().collect())
    }
}

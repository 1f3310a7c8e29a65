//! Package scanner
//!
//! Walks each package and every sub-module below it, loading each module
//! exactly once.

use crate::errors::ResolveResult;
use crate::module::Module;
use crate::source::ModuleSource;
use registrar_types::EntityStore;
use std::collections::HashSet;
use tracing::{debug, info};

/// Load the given packages and all their sub-modules.
///
/// Modules come back in walk order: packages in the order given, each
/// package before its sub-modules, siblings in lexical order. A module
/// reachable from more than one package appears once. The first load
/// failure aborts the scan.
pub fn scan<P, S>(packages: &[P], source: &mut S, store: &mut EntityStore) -> ResolveResult<Vec<Module>>
where
    P: AsRef<str>,
    S: ModuleSource + ?Sized,
{
    let mut seen = HashSet::new();
    let mut modules = Vec::new();

    for package in packages {
        let package = package.as_ref();
        info!(package = %package, "Scanning package");

        let mut pending = vec![package.to_string()];
        while let Some(path) = pending.pop() {
            if !seen.insert(path.clone()) {
                continue;
            }

            let module = source.load(&path, store)?;
            debug!(module = %path, bindings = module.bindings.len(), "Module loaded");
            modules.push(module);

            let children = source.submodules(&path)?;
            pending.extend(children.into_iter().rev());
        }
    }

    info!(modules = modules.len(), "Scan complete");
    Ok(modules)
}

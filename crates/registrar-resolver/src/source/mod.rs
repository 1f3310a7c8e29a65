//! Module sources
//!
//! A [`ModuleSource`] turns a dotted module path into a namespace of
//! bindings, constructing the module's entities into an [`EntityStore`] as
//! it goes. It is the explicit seam through which definitions enter the
//! resolver.
//!
//! - [`InMemorySource`]: namespaces assembled by the caller around entities
//!   it already constructed.
//! - [`ManifestSource`]: namespaces described by YAML manifests in a
//!   directory tree.

mod manifest;
mod memory;

pub use manifest::ManifestSource;
pub use memory::InMemorySource;

use crate::errors::ResolveResult;
use crate::module::Module;
use registrar_types::EntityStore;

/// Loads module namespaces by dotted path
pub trait ModuleSource {
    /// Load a module, or return the already loaded one.
    ///
    /// Loading may construct entities into `store`, including entities of
    /// other modules the loaded one refers to.
    fn load(&mut self, path: &str, store: &mut EntityStore) -> ResolveResult<Module>;

    /// Immediate sub-modules of a package, lexically sorted.
    /// A plain module has none.
    fn submodules(&self, path: &str) -> ResolveResult<Vec<String>>;
}

/// Whether `path` is a syntactically valid dotted module path
pub(crate) fn is_valid_path(path: &str) -> bool {
    !path.is_empty() && path.split('.').all(is_identifier)
}

pub(crate) fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

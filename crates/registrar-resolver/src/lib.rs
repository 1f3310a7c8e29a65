//! Registration order resolver for Registrar
//!
//! Given the names of the packages holding a user's definitions, the
//! resolver finds every task, workflow and launch plan *defined* in them,
//! adds a default launch plan for each workflow, and yields the entities in
//! an order that is safe to register: every entity comes after everything
//! it depends on. Dependency cycles are rejected with the exact cycle path.
//!
//! # Pipeline
//!
//! ```text
//! packages ──scan──▶ modules ──ModuleMap::build──▶ module map ──sort──▶ ordered entities
//!                                  (+ default launch plans)
//! ```
//!
//! # Usage
//!
//! ```rust
//! use registrar_resolver::{InMemorySource, Module, Resolver, SortOptions, Value};
//! use registrar_types::{EntityKind, EntityStore};
//!
//! let mut store = EntityStore::new();
//! let task = store.define(EntityKind::Task, Some("etl.jobs"));
//! let flow = store.define(EntityKind::Workflow, Some("etl.jobs"));
//! store.add_upstream(flow, task).unwrap();
//!
//! let mut source = InMemorySource::new();
//! source.insert(
//!     Module::new("etl.jobs")
//!         .bind("extract", Value::Entity(task))
//!         .bind("nightly", Value::Entity(flow)),
//! );
//!
//! let resolver = Resolver::scan_with_store(&["etl"], &mut source, store).unwrap();
//! let order: Vec<String> = resolver
//!     .collect_order(&SortOptions::default())
//!     .unwrap()
//!     .iter()
//!     .map(|r| format!("{} {}", r.entity.kind, r.qualified_name()))
//!     .collect();
//!
//! assert_eq!(
//!     order,
//!     vec![
//!         "task etl.jobs.extract",
//!         "workflow etl.jobs.nightly",
//!         "launch plan etl.jobs.nightly",
//!     ]
//! );
//! ```

#![deny(unsafe_code)]

mod errors;
mod filter;
mod graph;
mod module;
mod resolver;
mod scanner;
mod sort;
pub mod source;

pub use errors::{ResolveError, ResolveResult};
pub use filter::{KindFilter, SortOptions};
pub use graph::{Binding, ModuleMap};
pub use module::{Module, Value};
pub use resolver::Resolver;
pub use scanner::scan;
pub use sort::{sort, Registrable, TopologicalSort};
pub use source::{InMemorySource, ManifestSource, ModuleSource};

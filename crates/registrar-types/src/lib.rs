//! Entity Model for Registrar
//!
//! Registrar registers three kinds of definitions with a remote registry:
//! **tasks** (units of work), **workflows** (compositions of tasks and other
//! workflows) and **launch plans** (scheduled invocations of a workflow).
//! This crate holds the vocabulary every other crate shares.
//!
//! # Key Concepts
//!
//! - **EntityKind**: Which of the three definitions an entity is.
//! - **EntityId**: A stable arena handle. Entities are compared by identity,
//!   never by value: two identical task definitions are two graph nodes.
//! - **Entity**: Kind, upstream dependencies, the module it was constructed
//!   in, and an opaque spec payload for the registry.
//! - **EntityStore**: The process-scoped arena entities register into when
//!   they are constructed. Discovery and ordering read from it.
//!
//! # Usage
//!
//! ```rust
//! use registrar_types::{EntityKind, EntityStore};
//!
//! let mut store = EntityStore::new();
//! let task = store.define(EntityKind::Task, Some("pipelines.etl"));
//! let workflow = store.define(EntityKind::Workflow, Some("pipelines.etl"));
//! store.add_upstream(workflow, task).unwrap();
//!
//! let plan = store.create_default_launch_plan(workflow).unwrap();
//! assert_eq!(store.get(plan).unwrap().upstream, vec![workflow]);
//! ```

#![deny(unsafe_code)]

mod entity;
mod errors;
mod kind;
mod store;

pub use entity::*;
pub use errors::*;
pub use kind::*;
pub use store::*;

//! Registrar Client - registering resolved entities with a registry
//!
//! This crate takes the order produced by `registrar-resolver` and submits
//! each entity to a registry:
//!
//! - **RegistryClient**: The registry seam. Registering identical content
//!   twice succeeds without change; conflicting content is an error.
//! - **RegistrationDriver**: Resolves the complete order first, then
//!   registers one entity at a time. A resolution failure registers nothing.
//! - **Naming**: Registered names are `module.symbol`; versions can be
//!   taken from a container image tag.
//!
//! ## Registries
//!
//! [`InMemoryRegistryClient`] is suitable for tests and dry runs.
//! [`LocalRegistryClient`] keeps one JSON record per registered entity in a
//! directory tree.

#![deny(unsafe_code)]

pub mod client;
pub mod driver;
pub mod error;
pub mod local;
pub mod memory;
pub mod naming;
pub mod snapshot;

// Re-exports
pub use client::{RegistrationOutcome, RegistryClient};
pub use driver::{RegistrationDriver, RegistrationReport, ReportEntry};
pub use error::{RegistrationError, RegistrationResult};
pub use local::LocalRegistryClient;
pub use memory::InMemoryRegistryClient;
pub use naming::{fqdn, version_from_image};
pub use snapshot::{EntitySnapshot, RegistrationTarget};

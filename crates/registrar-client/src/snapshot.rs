//! Registrable content and registration targets

use crate::naming::fqdn;
use registrar_resolver::{Registrable, Resolver};
use registrar_types::EntityKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where entities are registered
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegistrationTarget {
    pub project: String,
    pub domain: String,
    pub version: String,
}

impl RegistrationTarget {
    pub fn new(
        project: impl Into<String>,
        domain: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            domain: domain.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for RegistrationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.project, self.domain, self.version)
    }
}

/// The content submitted to the registry for one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub kind: EntityKind,
    pub name: String,
    /// Registered names of the upstream entities
    pub upstream: Vec<String>,
    #[serde(default)]
    pub spec: serde_json::Value,
}

impl EntitySnapshot {
    /// Capture a resolved entity. Upstream entities outside the module map
    /// are named by their description.
    pub fn capture(item: &Registrable<'_>, resolver: &Resolver) -> Self {
        let map = resolver.module_map();
        let upstream = item
            .entity
            .upstream
            .iter()
            .map(|id| match map.get(*id) {
                Some(binding) => fqdn(&binding.module, &binding.symbol),
                None => resolver.store().describe(*id),
            })
            .collect();

        Self {
            kind: item.entity.kind,
            name: fqdn(item.module, item.symbol),
            upstream,
            spec: item.entity.spec.clone(),
        }
    }
}

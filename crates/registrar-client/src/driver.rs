//! Registration driver
//!
//! Resolves the complete registration order, then submits entities to a
//! [`RegistryClient`] one at a time in that order.

use crate::client::{RegistrationOutcome, RegistryClient};
use crate::error::RegistrationResult;
use crate::snapshot::{EntitySnapshot, RegistrationTarget};
use registrar_resolver::{Resolver, SortOptions};
use registrar_types::EntityKind;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// One line of a registration report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub kind: EntityKind,
    pub name: String,
    pub outcome: RegistrationOutcome,
}

/// What a registration run did, in registration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationReport {
    pub target: RegistrationTarget,
    pub entries: Vec<ReportEntry>,
}

impl RegistrationReport {
    pub fn count(&self, outcome: RegistrationOutcome) -> usize {
        self.entries.iter().filter(|e| e.outcome == outcome).count()
    }

    pub fn created(&self) -> usize {
        self.count(RegistrationOutcome::Created)
    }

    pub fn already_existing(&self) -> usize {
        self.count(RegistrationOutcome::AlreadyExists)
    }

    pub fn skipped(&self) -> usize {
        self.count(RegistrationOutcome::Skipped)
    }
}

/// Registers resolved entities with a registry
pub struct RegistrationDriver {
    client: Arc<dyn RegistryClient>,
    target: RegistrationTarget,
    dry_run: bool,
}

impl RegistrationDriver {
    pub fn new(client: Arc<dyn RegistryClient>, target: RegistrationTarget) -> Self {
        Self {
            client,
            target,
            dry_run: false,
        }
    }

    /// Report what would be registered without calling the registry
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn target(&self) -> &RegistrationTarget {
        &self.target
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Register every task, workflow and launch plan
    pub async fn register_all(&self, resolver: &Resolver) -> RegistrationResult<RegistrationReport> {
        self.register(resolver, &SortOptions::new()).await
    }

    /// Register tasks only
    pub async fn register_tasks_only(
        &self,
        resolver: &Resolver,
    ) -> RegistrationResult<RegistrationReport> {
        self.register(resolver, &SortOptions::new().include([EntityKind::Task]))
            .await
    }

    /// Register the entities admitted by `options`.
    ///
    /// The whole order is resolved before the first registry call; if it
    /// fails, nothing is registered.
    pub async fn register(
        &self,
        resolver: &Resolver,
        options: &SortOptions,
    ) -> RegistrationResult<RegistrationReport> {
        let snapshots: Vec<EntitySnapshot> = resolver
            .collect_order(options)?
            .iter()
            .map(|item| EntitySnapshot::capture(item, resolver))
            .collect();

        info!(
            target_ref = %self.target,
            entities = snapshots.len(),
            dry_run = self.dry_run,
            "Registering entities"
        );

        let mut entries = Vec::with_capacity(snapshots.len());
        for snapshot in snapshots {
            let outcome = if self.dry_run {
                RegistrationOutcome::Skipped
            } else {
                self.client.register(&self.target, &snapshot).await?
            };
            debug!(kind = %snapshot.kind, name = %snapshot.name, %outcome, "Registered");
            entries.push(ReportEntry {
                kind: snapshot.kind,
                name: snapshot.name,
                outcome,
            });
        }

        let report = RegistrationReport {
            target: self.target.clone(),
            entries,
        };
        info!(
            created = report.created(),
            already_existing = report.already_existing(),
            skipped = report.skipped(),
            "Registration complete"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistrationError;
    use crate::memory::InMemoryRegistryClient;
    use registrar_resolver::{InMemorySource, Module, ResolveError, Value};
    use registrar_types::EntityStore;

    fn etl_resolver() -> Resolver {
        let mut store = EntityStore::new();
        let extract = store.define(EntityKind::Task, Some("etl.jobs"));
        let load = store.define(EntityKind::Task, Some("etl.jobs"));
        let nightly = store.define(EntityKind::Workflow, Some("etl.jobs"));
        store.add_upstream(load, extract).unwrap();
        store.add_upstream(nightly, load).unwrap();

        let mut source = InMemorySource::new().with_module(
            Module::new("etl.jobs")
                .bind("extract", Value::Entity(extract))
                .bind("load", Value::Entity(load))
                .bind("nightly", Value::Entity(nightly)),
        );
        Resolver::scan_with_store(&["etl"], &mut source, store).unwrap()
    }

    fn driver(client: Arc<InMemoryRegistryClient>) -> RegistrationDriver {
        RegistrationDriver::new(client, RegistrationTarget::new("proj", "dev", "v1"))
    }

    fn names(report: &RegistrationReport) -> Vec<(EntityKind, &str)> {
        report
            .entries
            .iter()
            .map(|e| (e.kind, e.name.as_str()))
            .collect()
    }

    #[tokio::test]
    async fn test_register_all_in_order() {
        let client = Arc::new(InMemoryRegistryClient::new());
        let report = driver(client.clone())
            .register_all(&etl_resolver())
            .await
            .unwrap();

        assert_eq!(
            names(&report),
            vec![
                (EntityKind::Task, "etl.jobs.extract"),
                (EntityKind::Task, "etl.jobs.load"),
                (EntityKind::Workflow, "etl.jobs.nightly"),
                (EntityKind::LaunchPlan, "etl.jobs.nightly"),
            ]
        );
        assert_eq!(report.created(), 4);
        assert_eq!(client.len(), 4);
    }

    #[tokio::test]
    async fn test_register_tasks_only() {
        let client = Arc::new(InMemoryRegistryClient::new());
        let report = driver(client.clone())
            .register_tasks_only(&etl_resolver())
            .await
            .unwrap();

        assert_eq!(
            names(&report),
            vec![
                (EntityKind::Task, "etl.jobs.extract"),
                (EntityKind::Task, "etl.jobs.load"),
            ]
        );
        assert_eq!(client.len(), 2);
    }

    #[tokio::test]
    async fn test_second_run_is_idempotent() {
        let client = Arc::new(InMemoryRegistryClient::new());
        let resolver = etl_resolver();
        driver(client.clone()).register_all(&resolver).await.unwrap();

        let report = driver(client.clone()).register_all(&resolver).await.unwrap();
        assert_eq!(report.created(), 0);
        assert_eq!(report.already_existing(), 4);
        assert_eq!(client.len(), 4);
    }

    #[tokio::test]
    async fn test_dry_run_registers_nothing() {
        let client = Arc::new(InMemoryRegistryClient::new());
        let report = driver(client.clone())
            .with_dry_run(true)
            .register_all(&etl_resolver())
            .await
            .unwrap();

        assert_eq!(report.skipped(), 4);
        assert!(client.is_empty());
    }

    #[tokio::test]
    async fn test_cycle_registers_nothing() {
        let mut store = EntityStore::new();
        let base = store.define(EntityKind::Task, Some("m"));
        let a = store.define(EntityKind::Workflow, Some("m"));
        let b = store.define(EntityKind::Workflow, Some("m"));
        store.add_upstream(a, b).unwrap();
        store.add_upstream(b, a).unwrap();

        let mut source = InMemorySource::new().with_module(
            Module::new("m")
                .bind("A", Value::Entity(a))
                .bind("B", Value::Entity(b))
                .bind("base", Value::Entity(base)),
        );
        let resolver = Resolver::scan_with_store(&["m"], &mut source, store).unwrap();

        let client = Arc::new(InMemoryRegistryClient::new());
        let result = driver(client.clone()).register_all(&resolver).await;

        assert!(matches!(
            result,
            Err(RegistrationError::Resolve(ResolveError::CycleDetected { .. }))
        ));
        assert!(client.is_empty());
    }
}

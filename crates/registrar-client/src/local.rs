//! Directory-backed registry client
//!
//! Each registered entity is one JSON record at
//! `<root>/<project>/<domain>/<kind>/<name>/<version>.json`.

use crate::client::{RegistrationOutcome, RegistryClient};
use crate::error::{RegistrationError, RegistrationResult};
use crate::snapshot::{EntitySnapshot, RegistrationTarget};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use registrar_types::EntityKind;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::debug;

static STAGING_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// A stored registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryRecord {
    pub project: String,
    pub domain: String,
    pub version: String,
    pub registered_at: DateTime<Utc>,
    pub entity: EntitySnapshot,
}

/// Registry kept in a local directory tree
#[derive(Debug, Clone)]
pub struct LocalRegistryClient {
    root: PathBuf,
}

impl LocalRegistryClient {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of the record for an entity
    pub fn record_path(
        &self,
        target: &RegistrationTarget,
        kind: EntityKind,
        name: &str,
    ) -> RegistrationResult<PathBuf> {
        let version = format!("{}.json", checked(&target.version)?);
        Ok(self
            .root
            .join(checked(&target.project)?)
            .join(checked(&target.domain)?)
            .join(kind.as_str())
            .join(checked(name)?)
            .join(version))
    }

    async fn write_staged(staging: &Path, json: &[u8]) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(staging)
            .await?;
        file.write_all(json).await?;
        file.sync_all().await
    }

    async fn read_record(path: &Path) -> RegistrationResult<Option<RegistryRecord>> {
        match fs::read(path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn compare(
        existing: &RegistryRecord,
        target: &RegistrationTarget,
        entity: &EntitySnapshot,
    ) -> RegistrationResult<RegistrationOutcome> {
        if &existing.entity == entity {
            Ok(RegistrationOutcome::AlreadyExists)
        } else {
            Err(RegistrationError::Conflict {
                kind: entity.kind,
                project: target.project.clone(),
                domain: target.domain.clone(),
                name: entity.name.clone(),
                version: target.version.clone(),
            })
        }
    }
}

/// Unique hidden sibling of `path` for staging a write
fn staging_path(path: &Path) -> PathBuf {
    let sequence = STAGING_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(
        ".{}.{}-{}.tmp",
        file_name,
        std::process::id(),
        sequence
    ))
}

/// Reject names that would escape or collapse the record layout
fn checked(component: &str) -> RegistrationResult<&str> {
    if component.is_empty()
        || component == "."
        || component.contains("..")
        || component.contains('/')
        || component.contains('\\')
    {
        return Err(RegistrationError::InvalidName(component.to_string()));
    }
    Ok(component)
}

#[async_trait]
impl RegistryClient for LocalRegistryClient {
    async fn register(
        &self,
        target: &RegistrationTarget,
        entity: &EntitySnapshot,
    ) -> RegistrationResult<RegistrationOutcome> {
        let path = self.record_path(target, entity.kind, &entity.name)?;

        if let Some(existing) = Self::read_record(&path).await? {
            return Self::compare(&existing, target, entity);
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let record = RegistryRecord {
            project: target.project.clone(),
            domain: target.domain.clone(),
            version: target.version.clone(),
            registered_at: Utc::now(),
            entity: entity.clone(),
        };
        let json = serde_json::to_vec_pretty(&record)?;

        // The record appears fully written or not at all: write a temporary
        // sibling, then hard-link it into place (fails if the record exists)
        let staging = staging_path(&path);
        let written = Self::write_staged(&staging, &json).await;
        let linked = match written {
            Ok(()) => fs::hard_link(&staging, &path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = fs::remove_file(&staging).await {
            if e.kind() != ErrorKind::NotFound {
                debug!(path = %staging.display(), error = %e, "Could not remove staging file");
            }
        }

        match linked {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                // Lost a race with another writer
                return match Self::read_record(&path).await? {
                    Some(existing) => Self::compare(&existing, target, entity),
                    None => Err(RegistrationError::Storage(format!(
                        "record {} vanished while registering",
                        path.display()
                    ))),
                };
            }
            Err(e) => return Err(e.into()),
        }

        debug!(path = %path.display(), "Wrote registry record");
        Ok(RegistrationOutcome::Created)
    }

    async fn get(
        &self,
        target: &RegistrationTarget,
        kind: EntityKind,
        name: &str,
    ) -> RegistrationResult<Option<EntitySnapshot>> {
        let path = self.record_path(target, kind, name)?;
        Ok(Self::read_record(&path).await?.map(|r| r.entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn workflow(upstream: &[&str]) -> EntitySnapshot {
        EntitySnapshot {
            kind: EntityKind::Workflow,
            name: "pipelines.daily".into(),
            upstream: upstream.iter().map(|s| s.to_string()).collect(),
            spec: serde_json::Value::Null,
        }
    }

    #[tokio::test]
    async fn test_register_writes_record() {
        let dir = TempDir::new().unwrap();
        let registry = LocalRegistryClient::new(dir.path());
        let target = RegistrationTarget::new("proj", "dev", "v1");
        let entity = workflow(&["pipelines.extract"]);

        let outcome = registry.register(&target, &entity).await.unwrap();
        assert_eq!(outcome, RegistrationOutcome::Created);

        let path = dir
            .path()
            .join("proj/dev/workflow/pipelines.daily/v1.json");
        assert!(path.is_file());

        let record: RegistryRecord =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(record.project, "proj");
        assert_eq!(record.entity, entity);

        let fetched = registry
            .get(&target, EntityKind::Workflow, "pipelines.daily")
            .await
            .unwrap();
        assert_eq!(fetched, Some(entity));
    }

    #[tokio::test]
    async fn test_reregistering_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let registry = LocalRegistryClient::new(dir.path());
        let target = RegistrationTarget::new("proj", "dev", "v1");
        let entity = workflow(&[]);

        registry.register(&target, &entity).await.unwrap();
        let outcome = registry.register(&target, &entity).await.unwrap();
        assert_eq!(outcome, RegistrationOutcome::AlreadyExists);
    }

    #[tokio::test]
    async fn test_conflicting_content_is_rejected() {
        let dir = TempDir::new().unwrap();
        let registry = LocalRegistryClient::new(dir.path());
        let target = RegistrationTarget::new("proj", "dev", "v1");

        registry.register(&target, &workflow(&[])).await.unwrap();
        let result = registry
            .register(&target, &workflow(&["pipelines.extract"]))
            .await;
        assert!(matches!(result, Err(RegistrationError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_launch_plan_and_workflow_share_a_name() {
        let dir = TempDir::new().unwrap();
        let registry = LocalRegistryClient::new(dir.path());
        let target = RegistrationTarget::new("proj", "dev", "v1");
        let plan = EntitySnapshot {
            kind: EntityKind::LaunchPlan,
            ..workflow(&["pipelines.daily"])
        };

        registry.register(&target, &workflow(&[])).await.unwrap();
        let outcome = registry.register(&target, &plan).await.unwrap();
        assert_eq!(outcome, RegistrationOutcome::Created);
        assert!(dir
            .path()
            .join("proj/dev/launch_plan/pipelines.daily/v1.json")
            .is_file());
    }

    #[tokio::test]
    async fn test_path_components_are_checked() {
        let dir = TempDir::new().unwrap();
        let registry = LocalRegistryClient::new(dir.path());

        for target in [
            RegistrationTarget::new("../escape", "dev", "v1"),
            RegistrationTarget::new("proj", "", "v1"),
            RegistrationTarget::new("proj", "dev", "a/b"),
        ] {
            let result = registry.register(&target, &workflow(&[])).await;
            assert!(matches!(result, Err(RegistrationError::InvalidName(_))));
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_missing_record() {
        let dir = TempDir::new().unwrap();
        let registry = LocalRegistryClient::new(dir.path());
        let target = RegistrationTarget::new("proj", "dev", "v1");
        let fetched = registry
            .get(&target, EntityKind::Task, "pipelines.extract")
            .await
            .unwrap();
        assert!(fetched.is_none());
    }

    #[tokio::test]
    async fn test_only_the_record_is_left_behind() {
        let dir = TempDir::new().unwrap();
        let registry = LocalRegistryClient::new(dir.path());
        let target = RegistrationTarget::new("proj", "dev", "v1");
        registry.register(&target, &workflow(&[])).await.unwrap();

        let record_dir = dir.path().join("proj/dev/workflow/pipelines.daily");
        let files: Vec<String> = std::fs::read_dir(&record_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(files, vec!["v1.json".to_string()]);
    }

    #[tokio::test]
    async fn test_interrupted_write_does_not_block_registration() {
        let dir = TempDir::new().unwrap();
        let registry = LocalRegistryClient::new(dir.path());
        let target = RegistrationTarget::new("proj", "dev", "v1");

        // Half-written staging file left by an earlier run
        let record_dir = dir.path().join("proj/dev/workflow/pipelines.daily");
        std::fs::create_dir_all(&record_dir).unwrap();
        std::fs::write(record_dir.join(".v1.json.stale.tmp"), b"{\"proj").unwrap();

        let outcome = registry.register(&target, &workflow(&[])).await.unwrap();
        assert_eq!(outcome, RegistrationOutcome::Created);
        let outcome = registry.register(&target, &workflow(&[])).await.unwrap();
        assert_eq!(outcome, RegistrationOutcome::AlreadyExists);
    }
}

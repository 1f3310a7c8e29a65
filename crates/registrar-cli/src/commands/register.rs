//! Register command

use super::ScanTarget;
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::{self, print_success, print_warning, OutputFormat};
use clap::{Args, ValueEnum};
use registrar_client::{
    version_from_image, InMemoryRegistryClient, LocalRegistryClient, RegistrationDriver,
    RegistrationOutcome, RegistrationTarget, RegistryClient, ReportEntry,
};
use registrar_types::EntityKind;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tabled::Tabled;

/// What to register
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RegisterScope {
    /// Tasks only
    Tasks,
    /// Tasks, workflows and launch plans
    Workflows,
}

/// Arguments for `registrar register`
#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// What to register
    #[arg(value_enum)]
    pub scope: RegisterScope,

    /// Project to register into
    #[arg(short, long)]
    pub project: Option<String>,

    /// Domain to register into
    #[arg(short, long)]
    pub domain: Option<String>,

    /// Registration version
    #[arg(long, conflicts_with = "image")]
    pub version: Option<String>,

    /// Container image; its tag is the version
    #[arg(long)]
    pub image: Option<String>,

    /// Dry run: resolve and report without registering
    #[arg(long)]
    pub test: bool,

    /// Local registry directory
    #[arg(long)]
    pub registry_dir: Option<PathBuf>,
}

impl RegisterArgs {
    /// Registration target from arguments, then configuration
    pub fn target(&self, config: &CliConfig) -> CliResult<RegistrationTarget> {
        let project = self
            .project
            .clone()
            .or_else(|| config.project.clone())
            .ok_or_else(|| CliError::InvalidInput("No project; pass --project".into()))?;
        let domain = self
            .domain
            .clone()
            .or_else(|| config.domain.clone())
            .ok_or_else(|| CliError::InvalidInput("No domain; pass --domain".into()))?;
        let version = self.version(config)?;
        Ok(RegistrationTarget::new(project, domain, version))
    }

    fn version(&self, config: &CliConfig) -> CliResult<String> {
        if let Some(version) = self.version.clone().or_else(|| config.version.clone()) {
            return Ok(version);
        }
        match self.image.as_deref().or(config.image.as_deref()) {
            Some(image) => version_from_image(image).ok_or_else(|| {
                CliError::InvalidInput(format!("Image '{}' has no tag to use as version", image))
            }),
            None => Err(CliError::InvalidInput(
                "No version; pass --version or --image".into(),
            )),
        }
    }

    fn client(&self, config: &CliConfig) -> CliResult<Arc<dyn RegistryClient>> {
        match self.registry_dir.clone().or_else(|| config.registry_dir.clone()) {
            Some(dir) => Ok(Arc::new(LocalRegistryClient::new(dir))),
            None if self.test => Ok(Arc::new(InMemoryRegistryClient::new())),
            None => Err(CliError::InvalidInput(
                "No registry; pass --registry-dir or set registry_dir".into(),
            )),
        }
    }
}

/// Table row for a registration report
#[derive(Debug, Serialize, Tabled)]
pub struct ReportRow {
    pub kind: EntityKind,
    pub name: String,
    pub outcome: RegistrationOutcome,
}

impl From<ReportEntry> for ReportRow {
    fn from(entry: ReportEntry) -> Self {
        Self {
            kind: entry.kind,
            name: entry.name,
            outcome: entry.outcome,
        }
    }
}

/// Execute the register command
pub async fn execute(
    args: RegisterArgs,
    scan: &ScanTarget,
    config: &CliConfig,
    format: OutputFormat,
) -> CliResult<()> {
    let target = args.target(config)?;
    let client = args.client(config)?;
    if args.test {
        print_warning("Test mode: nothing will be registered");
    }

    let resolver = scan.resolve()?;
    let driver = RegistrationDriver::new(client, target).with_dry_run(args.test);
    let report = match args.scope {
        RegisterScope::Tasks => driver.register_tasks_only(&resolver).await?,
        RegisterScope::Workflows => driver.register_all(&resolver).await?,
    };

    let summary = format!(
        "{} created, {} already registered, {} skipped in {}",
        report.created(),
        report.already_existing(),
        report.skipped(),
        report.target
    );
    let rows: Vec<ReportRow> = report.entries.into_iter().map(ReportRow::from).collect();
    output::print_output(&rows, format)?;
    print_success(&summary);
    Ok(())
}

//! CLI commands

pub mod order;
pub mod register;

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use registrar_resolver::{ManifestSource, Resolver};
use std::path::PathBuf;
use tracing::info;

/// Where the packages live and which to scan
#[derive(Debug, Clone)]
pub struct ScanTarget {
    pub root: PathBuf,
    pub packages: Vec<String>,
}

impl ScanTarget {
    /// Command-line values win over the configuration file
    pub fn from_args(
        root: Option<PathBuf>,
        packages: Vec<String>,
        config: &CliConfig,
    ) -> CliResult<Self> {
        let root = root
            .or_else(|| config.root.clone())
            .unwrap_or_else(|| PathBuf::from("."));
        let packages = if packages.is_empty() {
            config.workflow_packages.clone()
        } else {
            packages
        };
        if packages.is_empty() {
            return Err(CliError::InvalidInput(
                "No packages to scan; pass --pkgs or set workflow_packages".into(),
            ));
        }
        Ok(Self { root, packages })
    }

    pub fn resolve(&self) -> CliResult<Resolver> {
        info!(root = %self.root.display(), packages = ?self.packages, "Scanning packages");
        let mut source = ManifestSource::new(&self.root);
        Ok(Resolver::scan(&self.packages, &mut source)?)
    }
}

//! Order command

use super::ScanTarget;
use crate::error::CliResult;
use crate::output::{self, OutputFormat};
use clap::Args;
use registrar_resolver::{Registrable, SortOptions};
use registrar_types::EntityKind;
use serde::Serialize;
use tabled::Tabled;

/// Arguments for `registrar order`
#[derive(Debug, Args)]
pub struct OrderArgs {
    /// Only list these kinds (task, workflow, launch_plan)
    #[arg(long = "include", value_name = "KIND")]
    pub include: Vec<EntityKind>,

    /// Leave out these kinds
    #[arg(long = "exclude", value_name = "KIND")]
    pub exclude: Vec<EntityKind>,

    /// Skip dependencies not defined in the scanned packages instead of failing
    #[arg(long)]
    pub allow_undefined: bool,
}

impl OrderArgs {
    pub fn sort_options(&self) -> SortOptions {
        let options = SortOptions::new()
            .include(self.include.iter().copied())
            .exclude(self.exclude.iter().copied());
        if self.allow_undefined {
            options.allow_undefined()
        } else {
            options
        }
    }
}

/// Table row for the registration order
#[derive(Debug, Serialize, Tabled)]
pub struct OrderRow {
    /// Position in the order, starting at 1
    #[tabled(rename = "#")]
    pub position: usize,
    pub kind: EntityKind,
    pub name: String,
    /// Defining module
    pub module: String,
}

impl OrderRow {
    fn new(position: usize, item: &Registrable<'_>) -> Self {
        Self {
            position,
            kind: item.entity.kind,
            name: item.qualified_name(),
            module: item.module.to_string(),
        }
    }
}

/// Execute the order command
pub fn execute(args: OrderArgs, target: &ScanTarget, format: OutputFormat) -> CliResult<()> {
    let options = args.sort_options();
    // Rejects conflicting filters before any package is loaded
    options.filter()?;

    let resolver = target.resolve()?;
    let rows: Vec<OrderRow> = resolver
        .collect_order(&options)?
        .iter()
        .enumerate()
        .map(|(i, item)| OrderRow::new(i + 1, item))
        .collect();

    output::print_output(&rows, format)
}

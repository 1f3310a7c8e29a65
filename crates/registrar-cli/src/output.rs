//! Output formatting utilities

use crate::error::CliResult;
use colored::*;
use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Render rows in the specified format
pub fn render<T: Serialize + Tabled>(rows: &[T], format: OutputFormat) -> CliResult<String> {
    Ok(match format {
        OutputFormat::Table if rows.is_empty() => "No results".dimmed().to_string(),
        OutputFormat::Table => Table::new(rows).to_string(),
        OutputFormat::Json => serde_json::to_string_pretty(rows)?,
        OutputFormat::Yaml => serde_yaml::to_string(rows)?,
    })
}

/// Print rows in the specified format
pub fn print_output<T: Serialize + Tabled>(rows: &[T], format: OutputFormat) -> CliResult<()> {
    println!("{}", render(rows, format)?);
    Ok(())
}

/// Print a single item in the specified format
pub fn print_single<T: Serialize>(data: &T, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Table | OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(data)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(data)?);
        }
    }
    Ok(())
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Tabled)]
    struct Row {
        kind: String,
        name: String,
    }

    fn rows() -> Vec<Row> {
        vec![Row {
            kind: "task".into(),
            name: "etl.extract".into(),
        }]
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Table);
    }

    #[test]
    fn test_render_table() {
        let table = render(&rows(), OutputFormat::Table).unwrap();
        assert!(table.contains("kind"));
        assert!(table.contains("etl.extract"));
    }

    #[test]
    fn test_render_json() {
        let json = render(&rows(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["name"], "etl.extract");
    }

    #[test]
    fn test_render_yaml() {
        let yaml = render(&rows(), OutputFormat::Yaml).unwrap();
        assert!(yaml.contains("name: etl.extract"));
    }

    #[test]
    fn test_render_empty_table() {
        let empty: Vec<Row> = Vec::new();
        assert!(render(&empty, OutputFormat::Table)
            .unwrap()
            .contains("No results"));
    }
}

use std::path::{Path, PathBuf};

use anyhow::Result;
use bardgen::check::Gap;
use bardgen::render::WriteSummary;
use bardgen::{CompletenessReport, Generation};
use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{Attribute, Cell, Color as TableColor, Table};
use serde::Serialize;

use crate::theme::{ICONS, THEME};

/// Output format options for CLI commands
#[derive(Clone, Debug, ValueEnum, Default, PartialEq)]
pub enum OutputFormat {
    /// Formatted table output (default)
    #[default]
    Table,
    /// JSON output for scripting
    Json,
}

/// Global CLI options that affect output and behavior
#[derive(Clone, Debug, Default)]
pub struct GlobalOptions {
    pub output_format: OutputFormat,
    pub quiet: bool,
    pub no_color: bool,
}

/// Trait for data that can be displayed as a table
pub trait TableDisplay {
    fn to_table(&self, options: &GlobalOptions) -> Table;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Written,
    Unchanged,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnitRow {
    pub unit: String,
    pub functions: usize,
    pub traits: usize,
    pub status: FileStatus,
}

/// What a generation run produced, as shown to the user.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub out_dir: PathBuf,
    pub units: Vec<UnitRow>,
    pub removed: Vec<PathBuf>,
    pub gaps: Vec<Gap>,
}

impl RunSummary {
    pub fn new(out_dir: &Path, generation: &Generation, written: &WriteSummary) -> Self {
        let units = generation
            .units
            .iter()
            .map(|unit| {
                let file = out_dir.join(format!("{}.rs", unit.name()));
                let status = if written.unchanged.contains(&file) {
                    FileStatus::Unchanged
                } else {
                    FileStatus::Written
                };
                UnitRow {
                    unit: unit.name().to_string(),
                    functions: unit.len(),
                    traits: unit.traits.len(),
                    status,
                }
            })
            .collect();

        Self {
            out_dir: out_dir.to_path_buf(),
            units,
            removed: written.removed.clone(),
            gaps: generation.report.gaps.clone(),
        }
    }

    pub fn function_count(&self) -> usize {
        self.units.iter().map(|u| u.functions).sum()
    }
}

impl TableDisplay for RunSummary {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = themed_table(options);
        set_header(&mut table, options, &["Unit", "Functions", "Traits", "File"]);
        for row in &self.units {
            let (icon, label) = match row.status {
                FileStatus::Written => (ICONS.written, "written"),
                FileStatus::Unchanged => (ICONS.unchanged, "unchanged"),
            };
            table.add_row(vec![
                Cell::new(&row.unit),
                Cell::new(row.functions),
                Cell::new(row.traits),
                Cell::new(format!("{icon} {label}")),
            ]);
        }
        for path in &self.removed {
            let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
            table.add_row(vec![
                Cell::new(name),
                Cell::new("-"),
                Cell::new("-"),
                Cell::new(format!("{} removed", ICONS.removed)),
            ]);
        }
        table
    }
}

impl TableDisplay for CompletenessReport {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = themed_table(options);
        set_header(&mut table, options, &["Target", "Table", "Operation", "Takes"]);
        for gap in &self.gaps {
            table.add_row(vec![
                Cell::new(&gap.target),
                Cell::new(gap.flavor),
                Cell::new(&gap.operation),
                Cell::new(gap.takes.as_deref().unwrap_or("-")),
            ]);
        }
        table
    }
}

fn themed_table(options: &GlobalOptions) -> Table {
    let mut table = Table::new();
    if options.no_color {
        table.load_preset(comfy_table::presets::ASCII_FULL);
    } else {
        table.load_preset(comfy_table::presets::UTF8_FULL_CONDENSED);
    }
    table
}

fn set_header(table: &mut Table, options: &GlobalOptions, headers: &[&str]) {
    let cells: Vec<Cell> = headers
        .iter()
        .map(|h| {
            let cell = Cell::new(h).add_attribute(Attribute::Bold);
            if options.no_color {
                cell
            } else {
                cell.fg(TableColor::Cyan)
            }
        })
        .collect();
    table.set_header(cells);
}

/// Output manager handles formatting and display
pub struct OutputManager {
    pub options: GlobalOptions,
}

impl OutputManager {
    pub fn new(options: GlobalOptions) -> Self {
        Self { options }
    }

    pub fn is_json(&self) -> bool {
        self.options.output_format == OutputFormat::Json
    }

    /// Display data according to the configured output format
    pub fn display<T>(&self, data: &T) -> Result<()>
    where
        T: Serialize + TableDisplay,
    {
        if self.options.quiet {
            return Ok(());
        }

        match self.options.output_format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(data)?;
                println!("{json}");
            }
            OutputFormat::Table => {
                let table = data.to_table(&self.options);
                println!("{table}");
            }
        }
        Ok(())
    }

    fn line(&self, icon: &str, color: colored::Color, message: &str) -> String {
        if self.options.no_color {
            format!("{icon} {message}")
        } else {
            format!("{} {}", icon.color(color), message.color(color))
        }
    }

    /// Display a success message with color and icon
    pub fn success(&self, message: &str) {
        if !self.options.quiet && !self.is_json() {
            println!("{}", self.line(ICONS.success, THEME.success, message));
        }
    }

    /// Errors are printed even in quiet mode.
    pub fn error(&self, message: &str) {
        eprintln!("{}", self.line(ICONS.error, THEME.error, message));
    }

    pub fn warning(&self, message: &str) {
        if !self.options.quiet {
            eprintln!("{}", self.line(ICONS.warning, THEME.warning, message));
        }
    }

    pub fn info(&self, message: &str) {
        if !self.options.quiet && !self.is_json() {
            println!("{}", self.line(ICONS.info, THEME.info, message));
        }
    }

    pub fn heading(&self, text: &str) {
        if self.options.quiet || self.is_json() {
            return;
        }
        let output = if self.options.no_color {
            format!("\n{text}\n{}", "=".repeat(text.len()))
        } else {
            format!("\n{}", text.color(THEME.primary).bold())
        };
        println!("{output}");
    }

    pub fn bullet(&self, text: &str) {
        if self.options.quiet || self.is_json() {
            return;
        }
        let output = if self.options.no_color {
            format!("  {} {text}", ICONS.bullet)
        } else {
            format!("  {} {text}", ICONS.bullet.color(THEME.muted))
        };
        println!("{output}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bardgen::Generator;

    fn summary() -> RunSummary {
        let generation = Generator::new().generate().unwrap();
        let out_dir = Path::new("out");
        let written = WriteSummary {
            written: vec![out_dir.join("builders.rs")],
            unchanged: vec![out_dir.join("getters.rs")],
            removed: vec![out_dir.join("old.rs")],
        };
        RunSummary::new(out_dir, &generation, &written)
    }

    #[test]
    fn test_run_summary_statuses() {
        let summary = summary();
        let statuses: Vec<_> = summary.units.iter().map(|u| (u.unit.as_str(), u.status)).collect();
        assert_eq!(statuses[0], ("builders", FileStatus::Written));
        assert_eq!(statuses[1], ("getters", FileStatus::Unchanged));
        assert!(summary.function_count() > 0);
        assert!(summary.gaps.is_empty());
    }

    #[test]
    fn test_run_summary_table_lists_removed_files() {
        let options = GlobalOptions {
            no_color: true,
            ..Default::default()
        };
        let table = summary().to_table(&options).to_string();
        assert!(table.contains("builders"));
        assert!(table.contains("old.rs"));
        assert!(table.contains("removed"));
    }

    #[test]
    fn test_run_summary_serializes_lowercase_status() {
        let json = serde_json::to_value(summary()).unwrap();
        assert_eq!(json["units"][0]["status"], "written");
        assert_eq!(json["units"][1]["status"], "unchanged");
    }

    #[test]
    fn test_output_manager_quiet() {
        let manager = OutputManager::new(GlobalOptions {
            quiet: true,
            output_format: OutputFormat::Json,
            ..Default::default()
        });
        assert!(manager.display(&CompletenessReport::default()).is_ok());
    }
}

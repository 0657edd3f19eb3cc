mod config;
mod output;
mod theme;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use bardgen::Generator;
use bardgen::pipeline::DEFAULT_TARGET_CRATE;
use clap::Parser;
use env_logger::Env;

use crate::config::BardgenConfig;
use crate::output::{GlobalOptions, OutputFormat, OutputManager, RunSummary};

#[derive(Parser)]
#[command(
    name = "bardgen",
    version,
    about = "Generate forwarding functions over a builder-style code-emission API",
    long_about = "Reads the interface manifest of the target library, resolves the builders, \
                  getters, modifiers and adders rule tables against it, and writes one Rust \
                  file per table plus a mod.rs into OUT_DIR."
)]
struct Cli {
    /// Directory the generated files are written to
    out_dir: PathBuf,

    /// Manifest file or directory (defaults to the bundled poet manifest)
    #[arg(long, value_name = "PATH")]
    manifest: Option<PathBuf>,

    /// Config file (defaults to ./bardgen.toml when present)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Crate path generated files import the target types from
    #[arg(long, value_name = "PATH")]
    target_crate: Option<String>,

    /// Fail instead of generating when an operation is not covered by any rule
    #[arg(long)]
    strict: bool,

    /// Only run the completeness check; exits non-zero when it finds gaps
    #[arg(long)]
    check: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    output: OutputFormat,

    /// Suppress non-error output
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Log pipeline progress
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "error" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let output = OutputManager::new(GlobalOptions {
        output_format: cli.output.clone(),
        quiet: cli.quiet,
        no_color: cli.no_color,
    });

    if let Err(err) = execute(&cli, &output) {
        output.error(&format!("Error: {err:#}"));
        std::process::exit(1);
    }
}

fn generator(cli: &Cli) -> Result<Generator> {
    let settings = BardgenConfig::load(cli.config.as_deref())?.generator;

    let target_crate = cli
        .target_crate
        .clone()
        .or(settings.target_crate)
        .unwrap_or_else(|| DEFAULT_TARGET_CRATE.to_string());
    let mut generator = Generator::new()
        .target_crate(target_crate)
        .strict(cli.strict || settings.strict);
    if let Some(manifest) = cli.manifest.clone().or(settings.manifest) {
        generator = generator.manifest_path(manifest);
    }
    Ok(generator)
}

fn execute(cli: &Cli, output: &OutputManager) -> Result<()> {
    let generator = generator(cli)?;

    if cli.check {
        let report = generator.check().context("Completeness check could not run")?;
        if report.is_complete() {
            output.display(&report)?;
            output.success("Every operation is covered by a rule");
            return Ok(());
        }
        output.heading("Uncovered operations");
        output.display(&report)?;
        bail!("{} operation(s) in {} are not covered", report.gaps.len(), report.targets().join(", "));
    }

    let (generation, written) = generator
        .write_to(&cli.out_dir)
        .with_context(|| format!("Failed to generate into {}", cli.out_dir.display()))?;
    let summary = RunSummary::new(&cli.out_dir, &generation, &written);

    output.heading("Generated units");
    output.display(&summary)?;

    if !generation.report.is_complete() {
        output.warning(&format!(
            "{} operation(s) are not covered by any rule:",
            generation.report.gaps.len()
        ));
        for gap in &generation.report.gaps {
            output.bullet(&gap.to_string());
        }
    }

    if written.written.is_empty() && written.removed.is_empty() {
        output.info(&format!("{} is up to date", cli.out_dir.display()));
    }
    output.success(&format!(
        "Generated {} functions in {} units into {}",
        summary.function_count(),
        summary.units.len(),
        cli.out_dir.display()
    ));
    Ok(())
}

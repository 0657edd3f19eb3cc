//! The end-to-end generator: load, extract, check, match, synthesize, assemble, render.

use std::path::{Path, PathBuf};

use log::info;

use crate::assemble::{self, GeneratedUnit};
use crate::check::{self, CompletenessReport};
use crate::errors::GenError;
use crate::extract;
use crate::manifest::Manifest;
use crate::matcher::BuildIndex;
use crate::model::TypeFamily;
use crate::registry::Registry;
use crate::render::{self, OutputDir, RenderedFile, WriteSummary};
use crate::rules::{Flavor, RuleTables};
use crate::synth;

/// Namespace generated files import the target library from by default.
pub const DEFAULT_TARGET_CRATE: &str = "poet";

#[derive(Debug, Clone)]
enum ManifestSource {
    Bundled,
    Path(PathBuf),
    Inline { label: String, source: String },
}

/// Result of a successful generation run, before anything is written.
#[derive(Debug, Clone)]
pub struct Generation {
    pub units: Vec<GeneratedUnit>,
    pub report: CompletenessReport,
    pub files: Vec<RenderedFile>,
}

impl Generation {
    /// Number of generated functions across all units.
    pub fn function_count(&self) -> usize {
        self.units.iter().map(GeneratedUnit::len).sum()
    }
}

/// Builder for configuring and running a generation.
///
/// Defaults to the bundled `poet` manifest, registry and rule tables.
#[derive(Debug, Clone)]
pub struct Generator {
    registry: Registry,
    manifest: ManifestSource,
    tables: Option<RuleTables>,
    target_crate: String,
    strict: bool,
}

impl Generator {
    pub fn new() -> Self {
        Self {
            registry: Registry::poet(),
            manifest: ManifestSource::Bundled,
            tables: None,
            target_crate: DEFAULT_TARGET_CRATE.to_string(),
            strict: false,
        }
    }

    /// Use a different type family. Usually paired with [`Generator::rule_tables`].
    pub fn registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    /// Read the manifest from a file or a directory instead of the bundled one.
    pub fn manifest_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest = ManifestSource::Path(path.into());
        self
    }

    /// Use manifest source text directly.
    pub fn manifest_source(mut self, label: impl Into<String>, source: impl Into<String>) -> Self {
        self.manifest = ManifestSource::Inline {
            label: label.into(),
            source: source.into(),
        };
        self
    }

    pub fn rule_tables(mut self, tables: RuleTables) -> Self {
        self.tables = Some(tables);
        self
    }

    /// Crate path generated files import the target types from.
    ///
    /// Default: `poet`
    pub fn target_crate(mut self, name: impl Into<String>) -> Self {
        self.target_crate = name.into();
        self
    }

    /// Fail when the completeness check finds uncovered operations.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    fn load_manifest(&self) -> Result<Manifest, GenError> {
        match &self.manifest {
            ManifestSource::Bundled => Manifest::poet(),
            ManifestSource::Path(path) => Manifest::load(path),
            ManifestSource::Inline { label, source } => Manifest::parse(label.clone(), source),
        }
    }

    fn tables(&self) -> Result<RuleTables, GenError> {
        let tables = match &self.tables {
            Some(tables) => tables.clone(),
            None => RuleTables::poet()?,
        };
        tables.validate(&self.registry)?;
        Ok(tables)
    }

    /// Loads the manifest and extracts the model of every registered type.
    pub fn extract(&self) -> Result<TypeFamily, GenError> {
        let manifest = self.load_manifest()?;
        Ok(extract::extract(&self.registry, &manifest)?)
    }

    /// Runs only the completeness check. Never fails on gaps, even in strict mode.
    pub fn check(&self) -> Result<CompletenessReport, GenError> {
        let tables = self.tables()?;
        let family = self.extract()?;
        Ok(check::check_completeness(&family, &tables))
    }

    /// Generates every unit in memory.
    pub fn generate(&self) -> Result<Generation, GenError> {
        let tables = self.tables()?;
        let family = self.extract()?;

        let report = check::check_completeness(&family, &tables);
        if self.strict && !report.is_complete() {
            return Err(GenError::Incomplete(report));
        }

        let builders = synth::synthesize_direct(Flavor::Builders, &family, &tables.builders)?;
        let getters = synth::synthesize_direct(Flavor::Getters, &family, &tables.getters)?;
        let modifiers = synth::synthesize_direct(Flavor::Modifiers, &family, &tables.modifiers)?;
        let index = BuildIndex::new(&builders);
        let adders = synth::synthesize_adders(&family, &tables.adders, &index)?;

        let units = assemble::assemble(
            &self.registry,
            &self.target_crate,
            vec![
                (Flavor::Builders, builders),
                (Flavor::Getters, getters),
                (Flavor::Modifiers, modifiers),
                (Flavor::Adders, adders),
            ],
        )?;
        let files = render::render_all(&units)?;

        let generation = Generation { units, report, files };
        info!(
            "generated {} functions in {} units",
            generation.function_count(),
            generation.units.len()
        );
        Ok(generation)
    }

    /// Generates, then writes into `dir`. Nothing is written if generation fails.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<(Generation, WriteSummary), GenError> {
        let generation = self.generate()?;
        let out = OutputDir::create(dir.as_ref())?;
        let summary = out.write(&generation.files)?;
        Ok((generation, summary))
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

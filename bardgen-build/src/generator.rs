//! Build-script wrapper around [`bardgen::Generator`].

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use bardgen::Generator;

/// Subdirectory of `$OUT_DIR` used when no output directory is set.
pub const DEFAULT_SUBDIR: &str = "bardgen";

/// Builder for configuring and running the generator from `build.rs`.
pub struct BuildGenerator {
    out_dir: Option<PathBuf>,
    manifest: Option<PathBuf>,
    target_crate: Option<String>,
    strict: bool,
}

impl BuildGenerator {
    pub fn new() -> Self {
        Self {
            out_dir: None,
            manifest: None,
            target_crate: None,
            strict: false,
        }
    }

    /// Set the directory the generated files are written to.
    ///
    /// Default: `$OUT_DIR/bardgen`
    pub fn out_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.out_dir = Some(path.into());
        self
    }

    /// Read the interface manifest from a file or directory.
    ///
    /// Cargo is told to rerun the build script when it changes.
    /// Default: the bundled `poet` manifest
    pub fn manifest(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest = Some(path.into());
        self
    }

    /// Set the crate path generated files import the target types from.
    ///
    /// Default: `poet`
    pub fn target_crate(mut self, name: impl Into<String>) -> Self {
        self.target_crate = Some(name.into());
        self
    }

    /// Fail the build when an operation is not covered by any rule.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    fn resolve_out_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.out_dir {
            return Ok(dir.clone());
        }
        let Some(out_dir) = env::var_os("OUT_DIR") else {
            bail!("OUT_DIR is not set; call out_dir() when running outside a build script");
        };
        Ok(PathBuf::from(out_dir).join(DEFAULT_SUBDIR))
    }

    /// Run the generator and return the directory holding `mod.rs`.
    pub fn run(self) -> Result<PathBuf> {
        let out_dir = self.resolve_out_dir()?;

        let mut generator = Generator::new().strict(self.strict);
        if let Some(name) = &self.target_crate {
            generator = generator.target_crate(name.clone());
        }
        if let Some(manifest) = &self.manifest {
            println!("cargo:rerun-if-changed={}", manifest.display());
            generator = generator.manifest_path(manifest.clone());
        }

        let (generation, summary) = generator
            .write_to(&out_dir)
            .with_context(|| format!("Failed to generate into {}", out_dir.display()))?;

        for path in &summary.written {
            eprintln!("bardgen-build: Generated {}", path.display());
        }
        for path in &summary.removed {
            eprintln!("bardgen-build: Removed stale {}", path.display());
        }
        for gap in &generation.report.gaps {
            println!("cargo:warning=bardgen: {gap}");
        }
        if !summary.written.is_empty() {
            eprintln!(
                "bardgen-build: {} functions in {} units",
                generation.function_count(),
                generation.units.len()
            );
        }

        Ok(out_dir)
    }
}

impl Default for BuildGenerator {
    fn default() -> Self {
        Self::new()
    }
}

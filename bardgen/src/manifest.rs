//! Loading the interface manifest of the target library.
//!
//! A manifest is ordinary Rust source describing the public surface of the
//! target library: one module per target type, holding the type, its
//! `Builder`, and their inherent `impl` blocks. Function bodies are ignored.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::debug;
use walkdir::WalkDir;

use crate::errors::{ConfigError, GenError};

/// Manifest of the bundled `poet` code-emission library.
pub const POET_MANIFEST: &str = include_str!("../manifest/poet.rs");

/// Items of one manifest module.
#[derive(Debug, Clone)]
pub struct ManifestModule {
    pub name: String,
    pub items: Vec<syn::Item>,
}

/// A parsed interface manifest.
#[derive(Debug, Clone)]
pub struct Manifest {
    label: String,
    modules: BTreeMap<String, ManifestModule>,
}

impl Manifest {
    /// Parses a single manifest source. Every top-level inline `mod` is a module.
    pub fn parse(label: impl Into<String>, source: &str) -> Result<Self, GenError> {
        let mut manifest = Self {
            label: label.into(),
            modules: BTreeMap::new(),
        };
        manifest.add_source(source)?;
        Ok(manifest)
    }

    /// The bundled `poet` manifest.
    pub fn poet() -> Result<Self, GenError> {
        Self::parse("poet (bundled)", POET_MANIFEST)
    }

    /// Loads a manifest from a file, or from a directory of `.rs` files.
    ///
    /// In a directory each file is a module named after its stem, except
    /// `lib.rs` and `mod.rs`, whose inline modules are read as in [`Manifest::parse`].
    pub fn load(path: &Path) -> Result<Self, GenError> {
        let label = path.display().to_string();
        if !path.is_dir() {
            let source = fs::read_to_string(path).map_err(|e| GenError::io(path, e))?;
            return Self::parse(label, &source);
        }

        let mut manifest = Self {
            label,
            modules: BTreeMap::new(),
        };
        let mut files: Vec<_> = WalkDir::new(path)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && e.path().extension().is_some_and(|ext| ext == "rs"))
            .map(|e| e.into_path())
            .collect();
        files.sort();

        for file in files {
            let source = fs::read_to_string(&file).map_err(|e| GenError::io(&file, e))?;
            let stem = file.file_stem().and_then(|s| s.to_str()).unwrap_or_default().to_string();
            debug!("reading manifest file {}", file.display());
            if stem == "lib" || stem == "mod" {
                manifest.add_source(&source)?;
            } else {
                let parsed = parse_file(&manifest.label, &source)?;
                manifest.insert(stem, parsed.items)?;
            }
        }
        Ok(manifest)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn module(&self, name: &str) -> Option<&ManifestModule> {
        self.modules.get(name)
    }

    pub fn modules(&self) -> impl Iterator<Item = &ManifestModule> {
        self.modules.values()
    }

    fn add_source(&mut self, source: &str) -> Result<(), GenError> {
        let file = parse_file(&self.label, source)?;
        for item in file.items {
            if let syn::Item::Mod(item_mod) = item
                && let Some((_, items)) = item_mod.content
            {
                self.insert(item_mod.ident.to_string(), items)?;
            }
        }
        Ok(())
    }

    fn insert(&mut self, name: String, items: Vec<syn::Item>) -> Result<(), GenError> {
        if self.modules.contains_key(&name) {
            return Err(ConfigError::DuplicateModule { module: name }.into());
        }
        self.modules.insert(name.clone(), ManifestModule { name, items });
        Ok(())
    }
}

fn parse_file(label: &str, source: &str) -> Result<syn::File, GenError> {
    syn::parse_file(source).map_err(|source| GenError::Manifest {
        label: label.to_string(),
        source,
    })
}

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "bardgen.toml";

/// Contents of `bardgen.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BardgenConfig {
    #[serde(default)]
    pub generator: GeneratorSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratorSettings {
    /// Crate path the generated files import the target types from.
    pub target_crate: Option<String>,
    /// Manifest file or directory, relative to the config file.
    pub manifest: Option<PathBuf>,
    #[serde(default)]
    pub strict: bool,
}

impl BardgenConfig {
    /// Loads `explicit`, or `bardgen.toml` in the working directory if it exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_path(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    Self::from_path(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config = Self::parse(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        if let Some(manifest) = &config.generator.manifest
            && manifest.is_relative()
            && let Some(base) = path.parent()
        {
            let resolved = base.join(manifest);
            config.generator.manifest = Some(resolved);
        }
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = BardgenConfig::parse("").unwrap();
        assert_eq!(config, BardgenConfig::default());
        assert!(!config.generator.strict);
    }

    #[test]
    fn test_generator_section() {
        let config = BardgenConfig::parse(
            r#"
            [generator]
            target_crate = "crate::poet"
            strict = true
            "#,
        )
        .unwrap();
        assert_eq!(config.generator.target_crate.as_deref(), Some("crate::poet"));
        assert!(config.generator.strict);
        assert!(config.generator.manifest.is_none());
    }

    #[test]
    fn test_manifest_is_relative_to_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bardgen.toml");
        fs::write(&path, "[generator]\nmanifest = \"api/poet.rs\"\n").unwrap();

        let config = BardgenConfig::from_path(&path).unwrap();
        assert_eq!(config.generator.manifest, Some(dir.path().join("api/poet.rs")));
    }

    #[test]
    fn test_unknown_value_type_is_an_error() {
        assert!(BardgenConfig::parse("[generator]\nstrict = \"yes\"\n").is_err());
    }
}

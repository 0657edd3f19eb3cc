//! The fixed family of target types the generator works over.

use std::collections::HashSet;

use heck::ToSnakeCase;

use crate::errors::ConfigError;

/// One registered builder-style type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetType {
    /// Type name as declared in the manifest (e.g. `TypeAliasSpec`).
    pub name: String,
    /// Module declaring the type and its `Builder` (e.g. `type_alias_spec`).
    pub module: String,
}

impl TargetType {
    /// Registers `name`, expected in the module named after it in snake case.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let module = name.to_snake_case();
        Self { name, module }
    }

    /// Registers `name`, declared in a module that does not follow the naming convention.
    pub fn in_module(name: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: module.into(),
        }
    }

    /// Name used when deriving generated function names: the type name without
    /// a `Spec` suffix, in snake case (`TypeAliasSpec` -> `type_alias`).
    pub fn short_name(&self) -> String {
        short_name(&self.name)
    }
}

pub(crate) fn short_name(type_name: &str) -> String {
    let trimmed = type_name.strip_suffix("Spec").filter(|s| !s.is_empty()).unwrap_or(type_name);
    trimmed.to_snake_case()
}

/// Order-stable, immutable list of target types.
#[derive(Debug, Clone)]
pub struct Registry {
    targets: Vec<TargetType>,
}

impl Registry {
    /// Builds a registry, rejecting duplicate names or modules.
    pub fn new(targets: impl IntoIterator<Item = TargetType>) -> Result<Self, ConfigError> {
        let targets: Vec<TargetType> = targets.into_iter().collect();
        let mut names = HashSet::new();
        let mut modules = HashSet::new();
        for target in &targets {
            if !names.insert(target.name.as_str()) {
                return Err(ConfigError::DuplicateTarget(target.name.clone()));
            }
            if !modules.insert(target.module.as_str()) {
                return Err(ConfigError::DuplicateModule {
                    module: target.module.clone(),
                });
            }
        }
        Ok(Self { targets })
    }

    /// The registry of the bundled `poet` manifest.
    pub fn poet() -> Self {
        let targets = [
            "FileSpec",
            "TypeSpec",
            "PropertySpec",
            "FunSpec",
            "ParameterSpec",
            "TypeAliasSpec",
            "AnnotationSpec",
            "CodeBlock",
        ]
        .into_iter()
        .map(TargetType::new)
        .collect();
        Self { targets }
    }

    pub fn iter(&self) -> impl Iterator<Item = &TargetType> {
        self.targets.iter()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&TargetType> {
        self.targets.iter().find(|t| t.name == name)
    }

    pub fn by_module(&self, module: &str) -> Option<&TargetType> {
        self.targets.iter().find(|t| t.module == module)
    }

    /// Registry position, used to restore deterministic ordering.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.targets.iter().position(|t| t.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_follows_snake_case() {
        assert_eq!(TargetType::new("TypeAliasSpec").module, "type_alias_spec");
        assert_eq!(TargetType::new("CodeBlock").module, "code_block");
    }

    #[test]
    fn test_short_name() {
        assert_eq!(TargetType::new("FileSpec").short_name(), "file");
        assert_eq!(TargetType::new("TypeAliasSpec").short_name(), "type_alias");
        assert_eq!(TargetType::new("CodeBlock").short_name(), "code_block");
        assert_eq!(TargetType::new("Spec").short_name(), "spec");
    }

    #[test]
    fn test_duplicate_target_is_rejected() {
        let err = Registry::new([TargetType::new("FunSpec"), TargetType::new("FunSpec")]).unwrap_err();
        assert_eq!(err, ConfigError::DuplicateTarget("FunSpec".into()));
    }

    #[test]
    fn test_poet_registry_order_is_stable() {
        let registry = Registry::poet();
        let names: Vec<_> = registry.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names.first(), Some(&"FileSpec"));
        assert_eq!(names.last(), Some(&"CodeBlock"));
        assert_eq!(registry.position("FunSpec"), Some(3));
        assert_eq!(registry.by_module("annotation_spec").map(|t| t.name.as_str()), Some("AnnotationSpec"));
    }

    #[test]
    fn test_explicit_module_must_be_unique() {
        let blocks = TargetType::in_module("Blocks", "code_block");
        assert_eq!(blocks.module, "code_block");
        assert_eq!(blocks.short_name(), "blocks");

        let err = Registry::new([TargetType::new("CodeBlock"), blocks]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::DuplicateModule {
                module: "code_block".into()
            }
        );
    }
}

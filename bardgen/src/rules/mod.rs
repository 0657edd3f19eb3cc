//! Declarative mapping rules: which operations get a generated forwarder, and
//! under what name.
//!
//! Tables are built with [`RuleTable::builder`]:
//!
//! ```
//! use bardgen::rules::{Flavor, RuleTable};
//!
//! let table = RuleTable::builder(Flavor::Builders)
//!     .target("TypeSpec", |t| {
//!         t.from("class_builder");
//!         t.from_named("annotation_builder", "annotation_class");
//!     })
//!     .finish()
//!     .unwrap();
//! assert_eq!(table.for_target("TypeSpec").unwrap().rules[1].generated, "build_annotation_class");
//! ```

pub mod tables;

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;

use crate::errors::ConfigError;
use crate::model::OpScope;
use crate::registry::{Registry, short_name};

/// The four kinds of generated forwarders, one output unit each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Flavor {
    /// `build_*` free functions over factory operations returning a `Builder`.
    Builders,
    /// Free functions over factory operations returning the built value.
    Getters,
    /// `modify` on built values, over instance operations returning a `Builder`.
    Modifiers,
    /// `add_*` builder methods that build a value and pass it to a mutator.
    Adders,
}

impl Flavor {
    pub const ALL: [Flavor; 4] = [Flavor::Builders, Flavor::Getters, Flavor::Modifiers, Flavor::Adders];

    /// Name of the generated unit (and file stem).
    pub fn unit_name(self) -> &'static str {
        match self {
            Flavor::Builders => "builders",
            Flavor::Getters => "getters",
            Flavor::Modifiers => "modifiers",
            Flavor::Adders => "adders",
        }
    }

    /// Where the underlying operations of this flavor are looked up.
    pub fn scope(self) -> OpScope {
        match self {
            Flavor::Builders | Flavor::Getters => OpScope::Factory,
            Flavor::Modifiers => OpScope::Instance,
            Flavor::Adders => OpScope::Builder,
        }
    }

    pub fn is_indirect(self) -> bool {
        self == Flavor::Adders
    }

    /// Whether the generated functions are free functions rather than methods,
    /// so their names share one namespace across every target type.
    pub fn is_free(self) -> bool {
        matches!(self, Flavor::Builders | Flavor::Getters)
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.unit_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleKind {
    /// Forward to the operation named `operation` on the target type.
    Direct {
        operation: String,
        /// Name other rules use to refer to this one (builders only).
        reference: String,
    },
    /// Build a value with the builders-flavor function `source` of the
    /// mutator's parameter type, then pass it to `mutator`.
    Indirect { source: String, mutator: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingRule {
    /// Unique within one target's rule list.
    pub key: String,
    pub generated: String,
    pub kind: RuleKind,
}

impl MappingRule {
    fn direct(operation: &str, reference: String, generated: String) -> Self {
        Self {
            key: operation.to_string(),
            generated,
            kind: RuleKind::Direct {
                operation: operation.to_string(),
                reference,
            },
        }
    }

    fn indirect(source: &str, generated: String, mutator: String) -> Self {
        Self {
            key: format!("{source}/{mutator}"),
            generated,
            kind: RuleKind::Indirect {
                source: source.to_string(),
                mutator,
            },
        }
    }

    /// The operation looked up on the rule's own target type.
    pub fn operation(&self) -> &str {
        match &self.kind {
            RuleKind::Direct { operation, .. } => operation,
            RuleKind::Indirect { mutator, .. } => mutator,
        }
    }
}

/// Ordered rules of one target type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRules {
    pub target: String,
    pub rules: Vec<MappingRule>,
}

/// One flavor's rules, keyed by target type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    flavor: Flavor,
    entries: Vec<TargetRules>,
}

impl RuleTable {
    pub fn builder(flavor: Flavor) -> RuleTableBuilder {
        RuleTableBuilder {
            flavor,
            entries: Vec::new(),
        }
    }

    pub fn empty(flavor: Flavor) -> Self {
        Self {
            flavor,
            entries: Vec::new(),
        }
    }

    pub fn flavor(&self) -> Flavor {
        self.flavor
    }

    pub fn iter(&self) -> impl Iterator<Item = &TargetRules> {
        self.entries.iter()
    }

    pub fn for_target(&self, target: &str) -> Option<&TargetRules> {
        self.entries.iter().find(|e| e.target == target)
    }

    pub fn len(&self) -> usize {
        self.entries.iter().map(|e| e.rules.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rejects entries for types the registry does not know.
    pub fn validate(&self, registry: &Registry) -> Result<(), ConfigError> {
        match self.entries.iter().find(|e| registry.get(&e.target).is_none()) {
            Some(entry) => Err(ConfigError::UnknownTarget {
                flavor: self.flavor,
                target: entry.target.clone(),
            }),
            None => Ok(()),
        }
    }
}

pub struct RuleTableBuilder {
    flavor: Flavor,
    entries: Vec<TargetRules>,
}

impl RuleTableBuilder {
    /// Declares the rules of one target type, in order.
    pub fn target(mut self, target: &str, declare: impl FnOnce(&mut TargetRulesBuilder)) -> Self {
        let mut rules = TargetRulesBuilder {
            flavor: self.flavor,
            short_name: short_name(target),
            rules: Vec::new(),
        };
        declare(&mut rules);
        self.entries.push(TargetRules {
            target: target.to_string(),
            rules: rules.rules,
        });
        self
    }

    pub fn finish(self) -> Result<RuleTable, ConfigError> {
        let flavor = self.flavor;
        let mut seen_targets = HashSet::new();
        let mut free_names: HashMap<&str, (&str, &str)> = HashMap::new();
        for entry in &self.entries {
            let target = &entry.target;
            if !seen_targets.insert(target.as_str()) {
                return Err(ConfigError::DuplicateTableEntry {
                    flavor,
                    target: target.clone(),
                });
            }

            let mut keys = HashSet::new();
            let mut names: HashMap<&str, &str> = HashMap::new();
            for rule in &entry.rules {
                if !keys.insert(rule.key.as_str()) {
                    return Err(ConfigError::DuplicateKey {
                        flavor,
                        target: target.clone(),
                        key: rule.key.clone(),
                    });
                }
                if let Some(first) = names.insert(rule.generated.as_str(), rule.key.as_str()) {
                    return Err(ConfigError::NameCollision {
                        flavor,
                        target: target.clone(),
                        name: rule.generated.clone(),
                        first: first.to_string(),
                        second: rule.key.clone(),
                    });
                }

                if flavor.is_free()
                    && let Some((first_target, first_key)) =
                        free_names.insert(rule.generated.as_str(), (target.as_str(), rule.key.as_str()))
                    && first_target != target
                {
                    return Err(ConfigError::SharedName {
                        flavor,
                        name: rule.generated.clone(),
                        first: format!("`{first_target}` rule `{first_key}`"),
                        second: format!("`{target}` rule `{}`", rule.key),
                    });
                }

                let indirect = matches!(rule.kind, RuleKind::Indirect { .. });
                if indirect != flavor.is_indirect() {
                    return Err(ConfigError::RuleKindMismatch {
                        flavor,
                        target: target.clone(),
                        key: rule.key.clone(),
                        expected: if flavor.is_indirect() { "`builds`" } else { "`from`" },
                    });
                }
                if syn::parse_str::<syn::Ident>(&rule.generated).is_err() {
                    return Err(ConfigError::InvalidName {
                        flavor,
                        target: target.clone(),
                        key: rule.key.clone(),
                        name: rule.generated.clone(),
                    });
                }
            }
        }
        Ok(RuleTable {
            flavor,
            entries: self.entries,
        })
    }
}

/// Collects the rules of one target type; see [`RuleTable::builder`].
pub struct TargetRulesBuilder {
    flavor: Flavor,
    short_name: String,
    rules: Vec<MappingRule>,
}

impl TargetRulesBuilder {
    /// Forwards `operation` under the default name.
    pub fn from(&mut self, operation: &str) -> &mut Self {
        let reference = self.default_reference(operation);
        let generated = self.default_generated(operation, &reference);
        self.push(MappingRule::direct(operation, reference, generated))
    }

    /// Forwards `operation` under a different reference name (and the name derived from it).
    pub fn from_named(&mut self, operation: &str, reference: &str) -> &mut Self {
        let generated = self.default_generated(operation, reference);
        self.push(MappingRule::direct(operation, reference.to_string(), generated))
    }

    /// Forwards `operation` as `generated`.
    pub fn from_as(&mut self, operation: &str, generated: &str) -> &mut Self {
        let reference = self.default_reference(operation);
        self.push(MappingRule::direct(operation, reference, generated.to_string()))
    }

    /// Builds with the builders-flavor function referenced as `source` and
    /// passes the value to the default mutator.
    pub fn builds(&mut self, source: &str) -> &mut Self {
        let generated = format!("add_{source}");
        self.builds_as(source, &generated)
    }

    pub fn builds_as(&mut self, source: &str, generated: &str) -> &mut Self {
        let mutator = format!("{generated}_spec");
        self.builds_as_via(source, generated, &mutator)
    }

    pub fn builds_via(&mut self, source: &str, mutator: &str) -> &mut Self {
        let generated = format!("add_{source}");
        self.builds_as_via(source, &generated, mutator)
    }

    pub fn builds_as_via(&mut self, source: &str, generated: &str, mutator: &str) -> &mut Self {
        self.push(MappingRule::indirect(source, generated.to_string(), mutator.to_string()))
    }

    fn push(&mut self, rule: MappingRule) -> &mut Self {
        self.rules.push(rule);
        self
    }

    fn default_reference(&self, operation: &str) -> String {
        if self.flavor != Flavor::Builders {
            return operation.to_string();
        }
        match operation.strip_suffix("_builder") {
            _ if operation == "builder" => self.short_name.clone(),
            Some(stripped) if !stripped.is_empty() => stripped.to_string(),
            _ => operation.to_string(),
        }
    }

    fn default_generated(&self, operation: &str, reference: &str) -> String {
        match self.flavor {
            Flavor::Builders => format!("build_{reference}"),
            Flavor::Getters => format!("{operation}_{}", self.short_name),
            Flavor::Modifiers => "modify".to_string(),
            Flavor::Adders => format!("add_{reference}"),
        }
    }
}

/// The four tables a generation run uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTables {
    pub builders: RuleTable,
    pub getters: RuleTable,
    pub modifiers: RuleTable,
    pub adders: RuleTable,
    /// Operations deliberately left without a rule, as `(target, operation)`.
    /// The completeness check skips them.
    pub excluded: Vec<(String, String)>,
}

impl Default for RuleTables {
    fn default() -> Self {
        Self {
            builders: RuleTable::empty(Flavor::Builders),
            getters: RuleTable::empty(Flavor::Getters),
            modifiers: RuleTable::empty(Flavor::Modifiers),
            adders: RuleTable::empty(Flavor::Adders),
            excluded: Vec::new(),
        }
    }
}

impl RuleTables {
    /// Leaves `operation` of `target` out of the completeness check.
    pub fn exclude(mut self, target: &str, operation: &str) -> Self {
        self.excluded.push((target.to_string(), operation.to_string()));
        self
    }

    pub fn is_excluded(&self, target: &str, operation: &str) -> bool {
        self.excluded.iter().any(|(t, op)| t == target && op == operation)
    }

    pub fn get(&self, flavor: Flavor) -> &RuleTable {
        match flavor {
            Flavor::Builders => &self.builders,
            Flavor::Getters => &self.getters,
            Flavor::Modifiers => &self.modifiers,
            Flavor::Adders => &self.adders,
        }
    }

    pub fn validate(&self, registry: &Registry) -> Result<(), ConfigError> {
        Flavor::ALL.iter().try_for_each(|&flavor| self.get(flavor).validate(registry))
    }
}

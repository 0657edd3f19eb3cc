//! Completeness check: finds operations the rule tables do not cover.
//!
//! Works on the extracted model and the tables alone, so it also reports gaps
//! in tables that would not resolve.

use std::collections::HashSet;
use std::fmt;

use log::warn;
use serde::Serialize;

use crate::model::{TargetModel, TypeFamily};
use crate::rules::{Flavor, RuleTable, RuleTables};

/// One uncovered operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Gap {
    pub target: String,
    /// Table expected to cover the operation.
    pub flavor: Flavor,
    pub operation: String,
    /// Target type the operation takes, for spec-typed builder methods.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub takes: Option<String>,
}

impl fmt::Display for Gap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.takes {
            Some(takes) => write!(
                f,
                "{}: builder method `{}` takes a `{takes}` but no {} rule uses it",
                self.target, self.operation, self.flavor
            ),
            None => write!(
                f,
                "{}: `{}` returns the builder but no {} rule forwards it",
                self.target, self.operation, self.flavor
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompletenessReport {
    pub gaps: Vec<Gap>,
}

impl CompletenessReport {
    pub fn is_complete(&self) -> bool {
        self.gaps.is_empty()
    }

    /// Offending target types, in the order they were reported.
    pub fn targets(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.gaps
            .iter()
            .map(|g| g.target.as_str())
            .filter(|t| seen.insert(*t))
            .collect()
    }
}

impl fmt::Display for CompletenessReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.gaps.is_empty() {
            return write!(f, "every operation is covered");
        }
        for (i, gap) in self.gaps.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  {gap}")?;
        }
        Ok(())
    }
}

fn covered<'t>(table: &'t RuleTable, model: &TargetModel) -> HashSet<&'t str> {
    table
        .for_target(model.name())
        .map(|entry| entry.rules.iter().map(|r| r.operation()).collect())
        .unwrap_or_default()
}

/// Lists every spec-typed builder method no adders rule uses, and every
/// builder-returning factory function no builders rule forwards, except the
/// operations the tables exclude.
///
/// Never stops at the first gap.
pub fn check_completeness(family: &TypeFamily, tables: &RuleTables) -> CompletenessReport {
    let mut gaps = Vec::new();
    for model in family.iter() {
        let mutators = covered(&tables.adders, model);
        for op in model.spec_typed_mutators() {
            if mutators.contains(op.name.as_str()) || tables.is_excluded(model.name(), &op.name) {
                continue;
            }
            gaps.push(Gap {
                target: model.name().to_string(),
                flavor: Flavor::Adders,
                operation: op.name.clone(),
                takes: op.spec_param.clone(),
            });
        }

        let factories = covered(&tables.builders, model);
        for op in &model.factory {
            if !op.returns_peeled(&model.builder)
                || factories.contains(op.name.as_str())
                || tables.is_excluded(model.name(), &op.name)
            {
                continue;
            }
            gaps.push(Gap {
                target: model.name().to_string(),
                flavor: Flavor::Builders,
                operation: op.name.clone(),
                takes: None,
            });
        }
    }

    for gap in &gaps {
        warn!("uncovered operation: {gap}");
    }
    CompletenessReport { gaps }
}

//! Resolves each mapping rule to exactly one extracted operation.

use std::collections::BTreeMap;

use crate::errors::ResolutionError;
use crate::model::{OpScope, Operation, TargetModel, TypeRef};
use crate::rules::{Flavor, MappingRule, RuleKind};
use crate::synth::GeneratedFunction;

/// Builders-flavor functions, keyed by target type and reference name.
///
/// Built once after the builders table is synthesized and only read afterwards.
#[derive(Debug, Default)]
pub struct BuildIndex {
    functions: BTreeMap<(String, String), GeneratedFunction>,
}

impl BuildIndex {
    pub fn new<'a>(functions: impl IntoIterator<Item = &'a GeneratedFunction>) -> Self {
        let functions = functions
            .into_iter()
            .filter_map(|f| {
                let reference = f.reference.clone()?;
                Some(((f.target.clone(), reference), f.clone()))
            })
            .collect();
        Self { functions }
    }

    pub fn get(&self, target: &str, reference: &str) -> Option<&GeneratedFunction> {
        self.functions.get(&(target.to_string(), reference.to_string()))
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

/// Return type a direct rule's operation must have, borrows peeled.
pub fn expected_return(flavor: Flavor, model: &TargetModel) -> TypeRef {
    match flavor {
        Flavor::Getters => model.ty(),
        _ => model.builder.clone(),
    }
}

fn describe_direct(flavor: Flavor, model: &TargetModel, operation: &str) -> String {
    format!(
        "{} `{operation}` returning `{}`",
        flavor.scope(),
        expected_return(flavor, model)
    )
}

/// Finds the operation a direct rule forwards to.
pub fn resolve_direct<'f>(
    flavor: Flavor,
    model: &'f TargetModel,
    rule: &MappingRule,
) -> Result<&'f Operation, ResolutionError> {
    let operation = rule.operation();
    let expected = expected_return(flavor, model);
    let named: Vec<&Operation> = model
        .operations(flavor.scope())
        .iter()
        .filter(|op| op.name == operation)
        .collect();
    let matching: Vec<&Operation> = named.iter().copied().filter(|op| op.returns_peeled(&expected)).collect();

    unique(matching, named.len(), || ResolveContext {
        flavor,
        target: model.name(),
        key: &rule.key,
        expected: describe_direct(flavor, model, operation),
    })
}

/// Finds the mutator an indirect rule passes its built value to, along with
/// the builders-flavor function that builds that value.
pub fn resolve_indirect<'f, 'i>(
    model: &'f TargetModel,
    rule: &MappingRule,
    index: &'i BuildIndex,
) -> Result<(&'f Operation, &'i GeneratedFunction), ResolutionError> {
    let RuleKind::Indirect { source, mutator } = &rule.kind else {
        return Err(ResolutionError::NoMatch {
            flavor: Flavor::Adders,
            target: model.name().to_string(),
            key: rule.key.clone(),
            expected: "an indirect rule".to_string(),
            near_misses: 0,
        });
    };

    let named: Vec<&Operation> = model
        .operations(OpScope::Builder)
        .iter()
        .filter(|op| &op.name == mutator)
        .collect();
    let matching: Vec<(&Operation, &GeneratedFunction)> = named
        .iter()
        .filter(|op| op.params.len() == 1)
        .filter_map(|op| {
            let built = op.spec_param.as_deref()?;
            index.get(built, source).map(|f| (*op, f))
        })
        .collect();

    unique(matching, named.len(), || ResolveContext {
        flavor: Flavor::Adders,
        target: model.name(),
        key: &rule.key,
        expected: format!("builder method `{mutator}` taking one value built by a `{source}` builders function"),
    })
}

struct ResolveContext<'a> {
    flavor: Flavor,
    target: &'a str,
    key: &'a str,
    expected: String,
}

fn unique<'a, T>(
    mut matching: Vec<T>,
    named: usize,
    context: impl FnOnce() -> ResolveContext<'a>,
) -> Result<T, ResolutionError> {
    if matching.len() == 1
        && let Some(found) = matching.pop()
    {
        return Ok(found);
    }
    let ResolveContext {
        flavor,
        target,
        key,
        expected,
    } = context();
    if matching.is_empty() {
        Err(ResolutionError::NoMatch {
            flavor,
            target: target.to_string(),
            key: key.to_string(),
            expected,
            near_misses: named,
        })
    } else {
        Err(ResolutionError::Ambiguous {
            flavor,
            target: target.to_string(),
            key: key.to_string(),
            expected,
            count: matching.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Param, Receiver};
    use crate::registry::TargetType;
    use crate::rules::RuleTable;
    use crate::synth::{Body, Call, Callee, Origin};

    fn op(name: &str, scope: OpScope, params: Vec<Param>, returns: TypeRef) -> Operation {
        let spec_param = match params.as_slice() {
            [only] if !only.variadic => only.ty.as_target().map(str::to_string),
            _ => None,
        };
        Operation {
            name: name.into(),
            scope,
            receiver: (scope != OpScope::Factory).then_some(Receiver::RefMut),
            params,
            returns: Some(returns),
            deprecation: None,
            spec_param,
        }
    }

    fn model(factory: Vec<Operation>, mutators: Vec<Operation>) -> TargetModel {
        let target = TargetType::new("TypeA");
        TargetModel {
            builder: TypeRef::builder_of(&target),
            target,
            factory,
            instance: Vec::new(),
            mutators,
        }
    }

    fn builder_a() -> TypeRef {
        TypeRef::Builder {
            target: "TypeA".into(),
            module: "type_a".into(),
        }
    }

    fn rule(flavor: Flavor, declare: impl FnOnce(&mut crate::rules::TargetRulesBuilder)) -> MappingRule {
        let table = RuleTable::builder(flavor).target("TypeA", declare).finish().unwrap();
        table.for_target("TypeA").unwrap().rules[0].clone()
    }

    fn build_fn(target: &str, reference: &str) -> GeneratedFunction {
        GeneratedFunction {
            name: format!("build_{reference}"),
            target: target.into(),
            origin: Origin {
                flavor: Flavor::Builders,
                key: reference.into(),
                rule_index: 0,
            },
            receiver: None,
            params: Vec::new(),
            returns: Some(TypeRef::Target(target.into())),
            body: Body::Forward(Call {
                callee: Callee::Associated {
                    owner: target.into(),
                    name: reference.into(),
                },
                args: Vec::new(),
            }),
            deprecation: None,
            reference: Some(reference.into()),
            doc: String::new(),
        }
    }

    #[test]
    fn test_direct_match_peels_borrows() {
        let returns = TypeRef::Borrowed {
            mutable: true,
            inner: Box::new(builder_a()),
        };
        let model = model(vec![op("new_a", OpScope::Factory, vec![], returns)], vec![]);
        let rule = rule(Flavor::Builders, |t| {
            t.from_as("new_a", "create_a");
        });
        assert_eq!(resolve_direct(Flavor::Builders, &model, &rule).unwrap().name, "new_a");
    }

    #[test]
    fn test_direct_no_match_counts_near_misses() {
        let model = model(
            vec![op("new_a", OpScope::Factory, vec![], TypeRef::Other("u32".into()))],
            vec![],
        );
        let rule = rule(Flavor::Builders, |t| {
            t.from("new_a");
        });
        let err = resolve_direct(Flavor::Builders, &model, &rule).unwrap_err();
        assert!(matches!(err, ResolutionError::NoMatch { near_misses: 1, .. }));
        assert_eq!(err.key(), "new_a");
        assert_eq!(err.target(), "TypeA");
    }

    #[test]
    fn test_direct_ambiguity_is_fatal() {
        let model = model(
            vec![
                op("new_a", OpScope::Factory, vec![], builder_a()),
                op(
                    "new_a",
                    OpScope::Factory,
                    vec![Param::new("n", TypeRef::Other("u8".into()))],
                    builder_a(),
                ),
            ],
            vec![],
        );
        let rule = rule(Flavor::Builders, |t| {
            t.from("new_a");
        });
        let err = resolve_direct(Flavor::Builders, &model, &rule).unwrap_err();
        assert!(matches!(err, ResolutionError::Ambiguous { count: 2, ref key, .. } if key == "new_a"));
    }

    #[test]
    fn test_getters_expect_the_target_type() {
        let model = model(vec![op("of", OpScope::Factory, vec![], builder_a())], vec![]);
        let rule = rule(Flavor::Getters, |t| {
            t.from("of");
        });
        assert!(resolve_direct(Flavor::Getters, &model, &rule).is_err());
    }

    #[test]
    fn test_indirect_needs_a_build_function_for_the_parameter_type() {
        let mutator = op(
            "add_b_spec",
            OpScope::Builder,
            vec![Param::new("b", TypeRef::Target("TypeB".into()))],
            builder_a(),
        );
        let model = model(vec![], vec![mutator]);
        let rule = rule(Flavor::Adders, |t| {
            t.builds("b");
        });

        let empty = BuildIndex::default();
        let err = resolve_indirect(&model, &rule, &empty).unwrap_err();
        assert!(matches!(err, ResolutionError::NoMatch { near_misses: 1, .. }));

        let source = build_fn("TypeB", "b");
        let index = BuildIndex::new([&source]);
        let (found, built) = resolve_indirect(&model, &rule, &index).unwrap();
        assert_eq!(found.name, "add_b_spec");
        assert_eq!(built.name, "build_b");
    }

    #[test]
    fn test_indirect_ignores_mutators_without_a_single_spec_parameter() {
        let mutator = op(
            "add_b_spec",
            OpScope::Builder,
            vec![
                Param::new("name", TypeRef::Other("& str".into())),
                Param::new("b", TypeRef::Target("TypeB".into())),
            ],
            builder_a(),
        );
        let model = model(vec![], vec![mutator]);
        let rule = rule(Flavor::Adders, |t| {
            t.builds("b");
        });
        let source = build_fn("TypeB", "b");
        let index = BuildIndex::new([&source]);
        assert!(resolve_indirect(&model, &rule, &index).is_err());
    }
}

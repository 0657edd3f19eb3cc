//! Call-forwarding synthesis: turns resolved rules into generated functions.
//!
//! The output is a small IR ([`GeneratedFunction`], [`Body`], [`Call`]) that the
//! renderer turns into Rust source. Nothing here produces tokens.

use log::debug;

use crate::errors::{ConfigError, GenError};
use crate::matcher::{self, BuildIndex};
use crate::model::{Deprecation, OpScope, Operation, Param, Receiver, TargetModel, TypeFamily, TypeRef};
use crate::rules::{Flavor, MappingRule, RuleKind, RuleTable};

/// Name of the builder-configuration parameter appended to build-category functions.
pub const CONFIG_PARAM: &str = "config";

/// Default of the configuration parameter when it is optional.
pub const EMPTY_CONFIG: &str = "|_| {}";

/// Suffix of the full form of a function with defaulted trailing parameters.
pub const EXPANDED_SUFFIX: &str = "_with";

/// The rule a generated function came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub flavor: Flavor,
    pub key: String,
    /// Position of the rule in its target's rule list.
    pub rule_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFunction {
    pub name: String,
    /// Owning target type.
    pub target: String,
    pub origin: Origin,
    /// How `self` is taken, and the type that receives the method.
    pub receiver: Option<(Receiver, TypeRef)>,
    pub params: Vec<Param>,
    pub returns: Option<TypeRef>,
    pub body: Body,
    pub deprecation: Option<Deprecation>,
    /// Reference name of builders-flavor functions.
    pub reference: Option<String>,
    pub doc: String,
}

impl GeneratedFunction {
    /// Index of the first parameter of the trailing run of defaulted ones.
    pub fn required_len(&self) -> usize {
        self.params.iter().rposition(|p| !p.has_default()).map_or(0, |i| i + 1)
    }

    /// Whether the function is rendered as a short form plus a `_with` full form.
    pub fn has_short_form(&self) -> bool {
        self.required_len() < self.params.len()
    }

    /// Name of the form taking every parameter.
    pub fn full_name(&self) -> String {
        if self.has_short_form() {
            format!("{}{EXPANDED_SUFFIX}", self.name)
        } else {
            self.name.clone()
        }
    }

    /// Every name the function occupies once rendered.
    pub fn rendered_names(&self) -> Vec<String> {
        if self.has_short_form() {
            vec![self.name.clone(), self.full_name()]
        } else {
            vec![self.name.clone()]
        }
    }

    /// `flavor table, target, rule` for diagnostics.
    pub fn provenance(&self) -> String {
        format!("{} rule `{}` of `{}`", self.origin.flavor, self.origin.key, self.target)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// Return the result of one call.
    Forward(Call),
    /// Obtain a builder from `construct`, apply the `config` parameter, then `build()`.
    Build { construct: Call, config: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub callee: Callee,
    /// In the callee's declared parameter order.
    pub args: Vec<Arg>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callee {
    /// `Owner::name(..)`
    Associated { owner: String, name: String },
    /// `self.name(..)`
    SelfMethod { name: String },
    /// Another generated free function; `expanded` calls its `_with` form.
    Generated { name: String, expanded: bool },
}

/// A callee parameter bound to a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arg {
    /// Callee parameter this binds.
    pub name: String,
    pub value: ArgValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    /// The generated function's parameter of this name.
    Param(String),
    Nested(Box<Call>),
}

/// Binds every callee parameter to the caller parameter of the same name.
fn bind_by_name(callee: &[Param]) -> Vec<Arg> {
    callee
        .iter()
        .map(|p| Arg {
            name: p.name.clone(),
            value: ArgValue::Param(p.name.clone()),
        })
        .collect()
}

/// Synthesizes every rule of a direct-flavor table.
pub fn synthesize_direct(flavor: Flavor, family: &TypeFamily, table: &RuleTable) -> Result<Vec<GeneratedFunction>, GenError> {
    let mut functions = Vec::new();
    for entry in table.iter() {
        let model = family.get(&entry.target).ok_or_else(|| ConfigError::UnknownTarget {
            flavor,
            target: entry.target.clone(),
        })?;
        for (rule_index, rule) in entry.rules.iter().enumerate() {
            let op = matcher::resolve_direct(flavor, model, rule)?;
            debug!("{flavor}: {}::{} -> {}", model.name(), op.name, rule.generated);
            let function = match flavor {
                Flavor::Builders => builder_function(model, rule, rule_index, op)?,
                Flavor::Getters => getter_function(model, rule, rule_index, op),
                Flavor::Modifiers => modifier_function(model, rule, rule_index, op)?,
                Flavor::Adders => {
                    return Err(ConfigError::RuleKindMismatch {
                        flavor,
                        target: entry.target.clone(),
                        key: rule.key.clone(),
                        expected: "`builds`",
                    }
                    .into());
                }
            };
            check_shadowing(model, rule, &function)?;
            functions.push(function);
        }
    }
    Ok(functions)
}

/// Synthesizes every rule of the adders table against the already built index.
pub fn synthesize_adders(family: &TypeFamily, table: &RuleTable, index: &BuildIndex) -> Result<Vec<GeneratedFunction>, GenError> {
    let mut functions = Vec::new();
    for entry in table.iter() {
        let model = family.get(&entry.target).ok_or_else(|| ConfigError::UnknownTarget {
            flavor: Flavor::Adders,
            target: entry.target.clone(),
        })?;
        for (rule_index, rule) in entry.rules.iter().enumerate() {
            let (mutator, source) = matcher::resolve_indirect(model, rule, index)?;
            debug!(
                "adders: {}::{} <- {} as {}",
                model.name(),
                mutator.name,
                source.name,
                rule.generated
            );
            let function = adder_function(model, rule, rule_index, mutator, source);
            check_shadowing(model, rule, &function)?;
            functions.push(function);
        }
    }
    Ok(functions)
}

fn origin(flavor: Flavor, rule: &MappingRule, rule_index: usize) -> Origin {
    Origin {
        flavor,
        key: rule.key.clone(),
        rule_index,
    }
}

/// Indefinite article for a type name.
fn article(noun: &str) -> &'static str {
    match noun.chars().next() {
        Some('A' | 'E' | 'I' | 'O' | 'U') => "an",
        _ => "a",
    }
}

fn config_param(model: &TargetModel) -> Param {
    Param::new(CONFIG_PARAM, TypeRef::Configure(Box::new(model.builder.clone())))
}

fn reject_reserved(flavor: Flavor, model: &TargetModel, rule: &MappingRule, op: &Operation) -> Result<(), ConfigError> {
    match op.params.iter().find(|p| p.name == CONFIG_PARAM) {
        Some(param) => Err(ConfigError::ReservedParameter {
            flavor,
            target: model.name().to_string(),
            key: rule.key.clone(),
            operation: op.name.clone(),
            parameter: param.name.clone(),
        }),
        None => Ok(()),
    }
}

fn builder_function(
    model: &TargetModel,
    rule: &MappingRule,
    rule_index: usize,
    op: &Operation,
) -> Result<GeneratedFunction, ConfigError> {
    reject_reserved(Flavor::Builders, model, rule, op)?;
    let mut params = op.params.clone();
    params.push(config_param(model).with_default(EMPTY_CONFIG));
    let reference = match &rule.kind {
        RuleKind::Direct { reference, .. } => reference.clone(),
        RuleKind::Indirect { source, .. } => source.clone(),
    };

    Ok(GeneratedFunction {
        name: rule.generated.clone(),
        target: model.name().to_string(),
        origin: origin(Flavor::Builders, rule, rule_index),
        receiver: None,
        body: Body::Build {
            construct: Call {
                callee: Callee::Associated {
                    owner: model.name().to_string(),
                    name: op.name.clone(),
                },
                args: bind_by_name(&op.params),
            },
            config: CONFIG_PARAM.to_string(),
        },
        params,
        returns: Some(model.ty()),
        deprecation: op.deprecation.clone(),
        reference: Some(reference),
        doc: format!(
            "Builds {a} [`{target}`] with [`{target}::{op}`], applying `config` to the builder before `build()`.",
            a = article(model.name()),
            target = model.name(),
            op = op.name,
        ),
    })
}

fn getter_function(model: &TargetModel, rule: &MappingRule, rule_index: usize, op: &Operation) -> GeneratedFunction {
    GeneratedFunction {
        name: rule.generated.clone(),
        target: model.name().to_string(),
        origin: origin(Flavor::Getters, rule, rule_index),
        receiver: None,
        params: op.params.clone(),
        returns: op.returns.clone(),
        body: Body::Forward(Call {
            callee: Callee::Associated {
                owner: model.name().to_string(),
                name: op.name.clone(),
            },
            args: bind_by_name(&op.params),
        }),
        deprecation: op.deprecation.clone(),
        reference: None,
        doc: format!("Shorthand for [`{}::{}`].", model.name(), op.name),
    }
}

fn modifier_function(
    model: &TargetModel,
    rule: &MappingRule,
    rule_index: usize,
    op: &Operation,
) -> Result<GeneratedFunction, ConfigError> {
    reject_reserved(Flavor::Modifiers, model, rule, op)?;
    let mut params = op.params.clone();
    params.push(config_param(model));

    Ok(GeneratedFunction {
        name: rule.generated.clone(),
        target: model.name().to_string(),
        origin: origin(Flavor::Modifiers, rule, rule_index),
        receiver: Some((op.receiver.unwrap_or(Receiver::Ref), model.ty())),
        params,
        returns: Some(model.ty()),
        body: Body::Build {
            construct: Call {
                callee: Callee::SelfMethod { name: op.name.clone() },
                args: bind_by_name(&op.params),
            },
            config: CONFIG_PARAM.to_string(),
        },
        deprecation: op.deprecation.clone(),
        reference: None,
        doc: format!(
            "Returns a copy rebuilt through [`{}::{}`] with `config` applied.",
            model.name(),
            op.name
        ),
    })
}

fn adder_function(
    model: &TargetModel,
    rule: &MappingRule,
    rule_index: usize,
    mutator: &Operation,
    source: &GeneratedFunction,
) -> GeneratedFunction {
    let nested = Call {
        callee: Callee::Generated {
            name: source.name.clone(),
            expanded: source.has_short_form(),
        },
        args: bind_by_name(&source.params),
    };
    let slot = mutator
        .params
        .first()
        .map_or_else(|| source.target.clone(), |p| p.name.clone());

    GeneratedFunction {
        name: rule.generated.clone(),
        target: model.name().to_string(),
        origin: origin(Flavor::Adders, rule, rule_index),
        receiver: Some((mutator.receiver.unwrap_or(Receiver::RefMut), model.builder.clone())),
        params: source.params.clone(),
        returns: mutator.returns.clone(),
        body: Body::Forward(Call {
            callee: Callee::SelfMethod {
                name: mutator.name.clone(),
            },
            args: vec![Arg {
                name: slot,
                value: ArgValue::Nested(Box::new(nested)),
            }],
        }),
        deprecation: mutator.deprecation.clone().or_else(|| source.deprecation.clone()),
        reference: None,
        doc: format!(
            "Builds {} [`{}`] with [`{}`] and passes it to `{}`.",
            article(&source.target),
            source.target,
            source.name,
            mutator.name
        ),
    }
}

/// An extension method named like an inherent method of its receiver would
/// never be called through method syntax.
fn check_shadowing(model: &TargetModel, rule: &MappingRule, function: &GeneratedFunction) -> Result<(), ConfigError> {
    if function.receiver.is_none() {
        return Ok(());
    }
    let scope = match function.origin.flavor {
        Flavor::Adders => OpScope::Builder,
        _ => OpScope::Instance,
    };
    let inherent = model.operations(scope);
    match function
        .rendered_names()
        .into_iter()
        .find(|name| inherent.iter().any(|op| &op.name == name))
    {
        Some(name) => Err(ConfigError::ShadowsInherent {
            flavor: function.origin.flavor,
            target: model.name().to_string(),
            key: rule.key.clone(),
            name,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract;
    use crate::manifest::Manifest;
    use crate::registry::{Registry, TargetType};

    const MANIFEST: &str = r#"
        pub mod type_a {
            use super::*;
            pub struct TypeA;
            pub struct Builder;
            impl TypeA {
                pub fn new_a(name: &str, #[bardgen(default = "0")] size: u32) -> Builder {}
                pub fn of(parts: impl IntoIterator<Item = String>) -> TypeA {}
                #[deprecated(note = "use `new_a`")]
                pub fn legacy() -> Builder {}
                pub fn to_builder(&self) -> Builder {}
                pub fn modify(&self) -> u8 {}
            }
            impl Builder {
                pub fn add_b_spec(&mut self, b: TypeB) -> &mut Self {}
                pub fn add_b(&mut self, name: &str) -> &mut Self {}
                pub fn build(self) -> TypeA {}
            }
        }
        pub mod type_b {
            use super::*;
            pub struct TypeB;
            pub struct Builder;
            impl TypeB {
                pub fn builder(config: u8) -> Builder {}
                pub fn named_builder(name: &str) -> Builder {}
            }
            impl Builder {
                pub fn build(self) -> TypeB {}
            }
        }
    "#;

    fn family() -> TypeFamily {
        let registry = Registry::new([TargetType::new("TypeA"), TargetType::new("TypeB")]).unwrap();
        let manifest = Manifest::parse("synth", MANIFEST).unwrap();
        extract::extract(&registry, &manifest).unwrap()
    }

    fn builders(declare: impl FnOnce(&mut crate::rules::TargetRulesBuilder)) -> RuleTable {
        RuleTable::builder(Flavor::Builders).target("TypeA", declare).finish().unwrap()
    }

    #[test]
    fn test_builder_function_appends_config() {
        let family = family();
        let table = builders(|t| {
            t.from_as("new_a", "create_a");
        });
        let functions = synthesize_direct(Flavor::Builders, &family, &table).unwrap();
        let create = &functions[0];

        let names: Vec<_> = create.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["name", "size", "config"]);
        assert_eq!(create.params[2].default.as_deref(), Some(EMPTY_CONFIG));
        assert_eq!(create.required_len(), 1);
        assert_eq!(create.rendered_names(), ["create_a", "create_a_with"]);
        assert_eq!(create.returns, Some(TypeRef::Target("TypeA".into())));
        assert_eq!(create.reference.as_deref(), Some("new_a"));

        let Body::Build { construct, .. } = &create.body else {
            panic!("expected a build body");
        };
        let bound: Vec<_> = construct.args.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(bound, ["name", "size"]);
    }

    #[test]
    fn test_deprecation_is_copied() {
        let family = family();
        let table = builders(|t| {
            t.from("legacy");
        });
        let functions = synthesize_direct(Flavor::Builders, &family, &table).unwrap();
        let note = functions[0].deprecation.as_ref().and_then(|d| d.note.as_deref());
        assert_eq!(note, Some("use `new_a`"));
    }

    #[test]
    fn test_getter_keeps_variadic_parameter() {
        let family = family();
        let table = RuleTable::builder(Flavor::Getters)
            .target("TypeA", |t| {
                t.from("of");
            })
            .finish()
            .unwrap();
        let functions = synthesize_direct(Flavor::Getters, &family, &table).unwrap();
        assert_eq!(functions[0].name, "of_type_a");
        assert!(functions[0].params[0].variadic);
        assert!(!functions[0].has_short_form());
    }

    #[test]
    fn test_config_parameter_name_is_reserved() {
        let family = family();
        let table = RuleTable::builder(Flavor::Builders)
            .target("TypeB", |t| {
                t.from("builder");
            })
            .finish()
            .unwrap();
        let err = synthesize_direct(Flavor::Builders, &family, &table).unwrap_err();
        assert!(matches!(
            err,
            GenError::Config(ConfigError::ReservedParameter { ref parameter, .. }) if parameter == "config"
        ));
    }

    #[test]
    fn test_modifier_cannot_shadow_inherent_method() {
        let family = family();
        let table = RuleTable::builder(Flavor::Modifiers)
            .target("TypeA", |t| {
                t.from("to_builder");
            })
            .finish()
            .unwrap();
        let err = synthesize_direct(Flavor::Modifiers, &family, &table).unwrap_err();
        assert!(matches!(err, GenError::Config(ConfigError::ShadowsInherent { ref name, .. }) if name == "modify"));
    }

    #[test]
    fn test_adder_nests_the_build_call() {
        let family = family();
        let table = RuleTable::builder(Flavor::Builders)
            .target("TypeB", |t| {
                t.from_named("named_builder", "b");
            })
            .finish()
            .unwrap();
        let built = synthesize_direct(Flavor::Builders, &family, &table).unwrap();
        let index = BuildIndex::new(&built);

        let adders = RuleTable::builder(Flavor::Adders)
            .target("TypeA", |t| {
                t.builds_as_via("b", "add_named_b", "add_b_spec");
            })
            .finish()
            .unwrap();
        let functions = synthesize_adders(&family, &adders, &index).unwrap();
        let add = &functions[0];

        assert_eq!(add.params, built[0].params);
        assert_eq!(add.receiver.as_ref().map(|(r, _)| *r), Some(Receiver::RefMut));
        let Body::Forward(call) = &add.body else {
            panic!("expected a forwarding body");
        };
        assert_eq!(call.callee, Callee::SelfMethod { name: "add_b_spec".into() });
        let ArgValue::Nested(nested) = &call.args[0].value else {
            panic!("expected a nested call");
        };
        assert_eq!(
            nested.callee,
            Callee::Generated {
                name: "build_b".into(),
                expanded: true,
            }
        );
    }

    #[test]
    fn test_adder_cannot_shadow_a_mutator() {
        let family = family();
        let table = RuleTable::builder(Flavor::Builders)
            .target("TypeB", |t| {
                t.from_named("named_builder", "b");
            })
            .finish()
            .unwrap();
        let built = synthesize_direct(Flavor::Builders, &family, &table).unwrap();
        let index = BuildIndex::new(&built);

        let adders = RuleTable::builder(Flavor::Adders)
            .target("TypeA", |t| {
                t.builds("b");
            })
            .finish()
            .unwrap();
        let err = synthesize_adders(&family, &adders, &index).unwrap_err();
        assert!(matches!(err, GenError::Config(ConfigError::ShadowsInherent { ref name, .. }) if name == "add_b"));
    }

    #[test]
    fn test_article_follows_the_type_name() {
        assert_eq!(article("AnnotationSpec"), "an");
        assert_eq!(article("FunSpec"), "a");
    }
}

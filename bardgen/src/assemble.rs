//! Groups generated functions into output units, one per flavor.

use std::collections::HashMap;

use crate::errors::ConfigError;
use crate::model::TypeRef;
use crate::registry::Registry;
use crate::rules::Flavor;
use crate::synth::{ArgValue, Body, Call, Callee, GeneratedFunction};

/// Marker carried by the first line of every generated file.
pub const GENERATED_MARKER: &str = "@generated by bardgen";

/// Extension methods sharing one receiver type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionTrait {
    pub name: String,
    /// Type the trait is implemented for.
    pub receiver: TypeRef,
    pub target: String,
    pub functions: Vec<GeneratedFunction>,
}

/// One output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    pub flavor: Flavor,
    pub header: String,
    /// Crate path the target types are imported from.
    pub namespace: String,
    /// Sibling units whose functions this unit calls.
    pub depends_on: Vec<Flavor>,
    /// Free functions, in registry order then rule order.
    pub functions: Vec<GeneratedFunction>,
    pub traits: Vec<ExtensionTrait>,
}

impl GeneratedUnit {
    pub fn name(&self) -> &'static str {
        self.flavor.unit_name()
    }

    pub fn len(&self) -> usize {
        self.functions.len() + self.traits.iter().map(|t| t.functions.len()).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Name of the extension trait for methods received by `receiver`.
pub fn trait_name(receiver: &TypeRef) -> String {
    match receiver.peeled() {
        TypeRef::Builder { target, .. } => format!("{target}BuilderExt"),
        TypeRef::Target(target) => format!("{target}Ext"),
        other => format!("{}Ext", other.to_string().replace(|c: char| !c.is_alphanumeric(), "")),
    }
}

fn calls_generated(call: &Call) -> bool {
    matches!(call.callee, Callee::Generated { .. })
        || call.args.iter().any(|arg| match &arg.value {
            ArgValue::Nested(nested) => calls_generated(nested),
            ArgValue::Param(_) => false,
        })
}

fn body_call(body: &Body) -> &Call {
    match body {
        Body::Forward(call) => call,
        Body::Build { construct, .. } => construct,
    }
}

/// Builds the units, in the order the flavors are given.
///
/// Every free function and extension trait is glob re-exported from one
/// module, so their names must be unique across all units.
pub fn assemble(
    registry: &Registry,
    namespace: &str,
    generated: Vec<(Flavor, Vec<GeneratedFunction>)>,
) -> Result<Vec<GeneratedUnit>, ConfigError> {
    let mut exported: HashMap<String, String> = HashMap::new();
    let mut units = Vec::with_capacity(generated.len());

    for (flavor, mut functions) in generated {
        functions.sort_by_key(|f| (registry.position(&f.target).unwrap_or(usize::MAX), f.origin.rule_index));

        let depends_on = if functions.iter().any(|f| calls_generated(body_call(&f.body))) {
            vec![Flavor::Builders]
        } else {
            Vec::new()
        };

        let mut free = Vec::new();
        let mut traits: Vec<ExtensionTrait> = Vec::new();
        for function in functions {
            let Some((_, receiver)) = function.receiver.clone() else {
                for name in function.rendered_names() {
                    claim(&mut exported, name, function.provenance())?;
                }
                free.push(function);
                continue;
            };
            let name = trait_name(&receiver);
            match traits.iter_mut().find(|t| t.name == name) {
                Some(existing) => existing.functions.push(function),
                None => traits.push(ExtensionTrait {
                    name,
                    receiver,
                    target: function.target.clone(),
                    functions: vec![function],
                }),
            }
        }

        for ext in &traits {
            claim(&mut exported, ext.name.clone(), format!("the {flavor} unit"))?;
            let mut methods = HashMap::new();
            for function in &ext.functions {
                for name in function.rendered_names() {
                    claim(&mut methods, name, function.provenance())?;
                }
            }
        }

        units.push(GeneratedUnit {
            flavor,
            header: format!("{GENERATED_MARKER} from the `{flavor}` rule table."),
            namespace: namespace.to_string(),
            depends_on,
            functions: free,
            traits,
        });
    }
    Ok(units)
}

fn claim(names: &mut HashMap<String, String>, name: String, owner: String) -> Result<(), ConfigError> {
    if let Some(first) = names.get(&name) {
        return Err(ConfigError::UnitCollision {
            name,
            first: first.clone(),
            second: owner,
        });
    }
    names.insert(name, owner);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Param, Receiver};
    use crate::registry::TargetType;
    use crate::synth::Origin;

    fn function(flavor: Flavor, target: &str, name: &str, rule_index: usize) -> GeneratedFunction {
        GeneratedFunction {
            name: name.into(),
            target: target.into(),
            origin: Origin {
                flavor,
                key: name.into(),
                rule_index,
            },
            receiver: None,
            params: Vec::new(),
            returns: None,
            body: Body::Forward(Call {
                callee: Callee::Associated {
                    owner: target.into(),
                    name: name.into(),
                },
                args: Vec::new(),
            }),
            deprecation: None,
            reference: None,
            doc: String::new(),
        }
    }

    fn registry() -> Registry {
        Registry::new([TargetType::new("Alpha"), TargetType::new("Beta")]).unwrap()
    }

    #[test]
    fn test_orders_by_registry_then_rule() {
        let functions = vec![
            function(Flavor::Getters, "Beta", "b0", 0),
            function(Flavor::Getters, "Alpha", "a1", 1),
            function(Flavor::Getters, "Alpha", "a0", 0),
        ];
        let units = assemble(&registry(), "poet", vec![(Flavor::Getters, functions)]).unwrap();
        let names: Vec<_> = units[0].functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["a0", "a1", "b0"]);
        assert_eq!(units[0].header, "@generated by bardgen from the `getters` rule table.");
        assert!(units[0].depends_on.is_empty());
    }

    #[test]
    fn test_receiver_functions_are_grouped_per_receiver() {
        let mut first = function(Flavor::Adders, "Alpha", "add_x", 0);
        first.receiver = Some((Receiver::RefMut, TypeRef::builder_of(&TargetType::new("Alpha"))));
        let mut second = first.clone();
        second.name = "add_y".into();
        second.origin.rule_index = 1;

        let units = assemble(&registry(), "poet", vec![(Flavor::Adders, vec![second, first])]).unwrap();
        assert!(units[0].functions.is_empty());
        assert_eq!(units[0].traits.len(), 1);
        assert_eq!(units[0].traits[0].name, "AlphaBuilderExt");
        assert_eq!(units[0].traits[0].functions[0].name, "add_x");
        assert_eq!(units[0].len(), 2);
    }

    #[test]
    fn test_collision_across_units() {
        let units = assemble(
            &registry(),
            "poet",
            vec![
                (Flavor::Builders, vec![function(Flavor::Builders, "Alpha", "shared", 0)]),
                (Flavor::Getters, vec![function(Flavor::Getters, "Beta", "shared", 0)]),
            ],
        );
        let err = units.unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnitCollision {
                name: "shared".into(),
                first: "builders rule `shared` of `Alpha`".into(),
                second: "getters rule `shared` of `Beta`".into(),
            }
        );
    }

    #[test]
    fn test_expanded_form_counts_as_a_name() {
        let mut defaulted = function(Flavor::Builders, "Alpha", "make", 0);
        defaulted.params = vec![Param::new("n", TypeRef::Other("u8".into())).with_default("0")];
        let clashing = function(Flavor::Getters, "Beta", "make_with", 0);

        let err = assemble(
            &registry(),
            "poet",
            vec![(Flavor::Builders, vec![defaulted]), (Flavor::Getters, vec![clashing])],
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnitCollision { ref name, .. } if name == "make_with"));
    }

    #[test]
    fn test_nested_generated_call_adds_dependency() {
        let mut adder = function(Flavor::Adders, "Alpha", "add_beta", 0);
        adder.receiver = Some((Receiver::RefMut, TypeRef::builder_of(&TargetType::new("Alpha"))));
        adder.body = Body::Forward(Call {
            callee: Callee::SelfMethod {
                name: "add_beta_spec".into(),
            },
            args: vec![crate::synth::Arg {
                name: "beta".into(),
                value: ArgValue::Nested(Box::new(Call {
                    callee: Callee::Generated {
                        name: "build_beta".into(),
                        expanded: false,
                    },
                    args: Vec::new(),
                })),
            }],
        });
        let units = assemble(&registry(), "poet", vec![(Flavor::Adders, vec![adder])]).unwrap();
        assert_eq!(units[0].depends_on, [Flavor::Builders]);
    }
}

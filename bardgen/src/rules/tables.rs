//! Rule tables for the bundled `poet` manifest.

use super::{Flavor, RuleTable, RuleTables};
use crate::errors::ConfigError;

/// Nested type kinds that a file or type can declare through `add_type_spec`.
const TYPE_KINDS: &[&str] = &[
    "class",
    "object",
    "interface",
    "fun_interface",
    "enum",
    "annotation_class",
    "expect_class",
    "anonymous_class",
];

impl RuleTables {
    /// The tables for [`crate::registry::Registry::poet`].
    ///
    /// `CodeBlock`'s `add_block` splices an existing block; building one just
    /// to splice it adds nothing over `add`, so it has no adder.
    pub fn poet() -> Result<Self, ConfigError> {
        let tables = Self {
            builders: builders()?,
            getters: getters()?,
            modifiers: modifiers()?,
            adders: adders()?,
            excluded: Vec::new(),
        };
        Ok(tables.exclude("CodeBlock", "add_block"))
    }
}

fn builders() -> Result<RuleTable, ConfigError> {
    RuleTable::builder(Flavor::Builders)
        .target("FileSpec", |t| {
            t.from("builder").from("script_builder");
        })
        .target("TypeSpec", |t| {
            t.from_named("annotation_builder", "annotation_class")
                .from("anonymous_class_builder")
                .from("class_builder")
                .from("companion_object_builder")
                .from("enum_builder")
                .from("expect_class_builder")
                .from("fun_interface_builder")
                .from("interface_builder")
                .from("object_builder");
        })
        .target("PropertySpec", |t| {
            t.from("builder");
        })
        .target("FunSpec", |t| {
            t.from_named("builder", "function")
                .from("constructor_builder")
                .from("getter_builder")
                .from("setter_builder")
                .from("overriding");
        })
        .target("ParameterSpec", |t| {
            t.from("builder");
        })
        .target("TypeAliasSpec", |t| {
            t.from("builder");
        })
        .target("AnnotationSpec", |t| {
            t.from("builder");
        })
        .target("CodeBlock", |t| {
            t.from_as("builder", "code_block");
        })
        .finish()
}

fn getters() -> Result<RuleTable, ConfigError> {
    RuleTable::builder(Flavor::Getters)
        .target("FileSpec", |t| {
            t.from("get");
        })
        .target("ParameterSpec", |t| {
            t.from("unnamed");
        })
        .target("AnnotationSpec", |t| {
            t.from("get");
        })
        .target("CodeBlock", |t| {
            t.from("of").from_as("join", "join_code_blocks");
        })
        .finish()
}

fn modifiers() -> Result<RuleTable, ConfigError> {
    [
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
    .fold(RuleTable::builder(Flavor::Modifiers), |table, target| {
        table.target(target, |t| {
            t.from("to_builder");
        })
    })
    .finish()
}

fn adders() -> Result<RuleTable, ConfigError> {
    RuleTable::builder(Flavor::Adders)
        .target("FileSpec", |t| {
            t.builds("annotation").builds("function").builds("property");
            for kind in TYPE_KINDS {
                t.builds_via(kind, "add_type_spec");
            }
            t.builds("type_alias");
        })
        .target("TypeSpec", |t| {
            t.builds("annotation").builds("function").builds("property");
            for kind in TYPE_KINDS {
                t.builds_via(kind, "add_type_spec");
            }
            t.builds_via("companion_object", "add_type_spec")
                .builds_as_via("constructor", "add_primary_constructor", "primary_constructor_spec")
                .builds_as_via("constructor", "add_constructor", "add_function_spec")
                .builds_as_via("code_block", "add_initializer", "add_initializer_block")
                .builds_as_via(
                    "code_block",
                    "add_superclass_constructor_argument",
                    "add_superclass_constructor_block",
                )
                .builds_as_via("code_block", "add_doc", "add_doc_block");
        })
        .target("PropertySpec", |t| {
            t.builds("annotation")
                .builds_as_via("getter", "add_getter", "getter_spec")
                .builds_as_via("setter", "add_setter", "setter_spec")
                .builds_as_via("code_block", "add_delegate", "delegate_block")
                .builds_as_via("code_block", "add_initializer", "initializer_block")
                .builds_as_via("code_block", "add_doc", "add_doc_block");
        })
        .target("FunSpec", |t| {
            t.builds("annotation")
                .builds("parameter")
                .builds_as_via("code_block", "add_code", "add_code_block")
                .builds_as_via("code_block", "add_doc", "add_doc_block");
        })
        .target("ParameterSpec", |t| {
            t.builds("annotation")
                .builds_as_via("code_block", "add_default_value", "default_value_block")
                .builds_as_via("code_block", "add_doc", "add_doc_block");
        })
        .target("TypeAliasSpec", |t| {
            t.builds("annotation").builds_as_via("code_block", "add_doc", "add_doc_block");
        })
        .target("AnnotationSpec", |t| {
            t.builds_as_via("code_block", "add_member", "add_member_block");
        })
        .finish()
}

// Interface manifest of `poet`, a builder-style code-emission library.
//
// Only signatures matter here: bodies are empty and never compiled. Each target
// type lives in its own module next to a `Builder`; `impl <Type>` holds the
// factory functions and `impl Builder` the mutators.

pub use annotation_spec::AnnotationSpec;
pub use code_block::CodeBlock;
pub use file_spec::FileSpec;
pub use fun_spec::FunSpec;
pub use parameter_spec::ParameterSpec;
pub use property_spec::PropertySpec;
pub use type_alias_spec::TypeAliasSpec;
pub use type_spec::TypeSpec;

pub struct TypeName;
pub struct ClassName;
pub struct MemberName;
pub struct Annotation;
pub struct Arg;

pub enum Modifier {
    Public,
    Private,
    Internal,
    Abstract,
    Open,
    Override,
    Expect,
    Data,
}

pub mod file_spec {
    use super::*;

    pub struct FileSpec;
    pub struct Builder;

    impl FileSpec {
        pub fn builder(package_name: &str, file_name: &str) -> Builder {}
        pub fn script_builder(file_name: &str) -> Builder {}
        pub fn get(package_name: &str, type_spec: TypeSpec) -> FileSpec {}

        pub fn to_builder(&self) -> Builder {}
        pub fn write_to(&self, out: &mut String) {}
    }

    impl Builder {
        pub fn add_annotation_spec(&mut self, annotation: AnnotationSpec) -> &mut Self {}
        pub fn add_function_spec(&mut self, function: FunSpec) -> &mut Self {}
        pub fn add_property_spec(&mut self, property: PropertySpec) -> &mut Self {}
        pub fn add_type_spec(&mut self, type_spec: TypeSpec) -> &mut Self {}
        pub fn add_type_alias_spec(&mut self, type_alias: TypeAliasSpec) -> &mut Self {}
        pub fn add_comment(&mut self, format: &str, args: impl IntoIterator<Item = Arg>) -> &mut Self {}
        pub fn add_import(&mut self, package_name: &str, names: impl IntoIterator<Item = String>) -> &mut Self {}
        pub fn indent(&mut self, indent: &str) -> &mut Self {}
        pub fn build(self) -> FileSpec {}
    }
}

pub mod type_spec {
    use super::*;

    pub struct TypeSpec;
    pub struct Builder;

    impl TypeSpec {
        pub fn class_builder(name: &str) -> Builder {}
        pub fn object_builder(name: &str) -> Builder {}
        pub fn interface_builder(name: &str) -> Builder {}
        pub fn fun_interface_builder(name: &str) -> Builder {}
        pub fn enum_builder(name: &str) -> Builder {}
        pub fn annotation_builder(name: &str) -> Builder {}
        pub fn anonymous_class_builder() -> Builder {}
        pub fn companion_object_builder(#[bardgen(default = "None")] name: Option<&str>) -> Builder {}
        #[deprecated(since = "0.3.0", note = "use `class_builder` with `Modifier::Expect`")]
        pub fn expect_class_builder(name: &str) -> Builder {}

        pub fn to_builder(&self) -> Builder {}
    }

    impl Builder {
        pub fn add_annotation_spec(&mut self, annotation: AnnotationSpec) -> &mut Self {}
        pub fn add_function_spec(&mut self, function: FunSpec) -> &mut Self {}
        pub fn add_property_spec(&mut self, property: PropertySpec) -> &mut Self {}
        pub fn add_type_spec(&mut self, type_spec: TypeSpec) -> &mut Self {}
        pub fn primary_constructor_spec(&mut self, constructor: FunSpec) -> &mut Self {}
        pub fn add_initializer_block(&mut self, block: CodeBlock) -> &mut Self {}
        pub fn add_superclass_constructor_block(&mut self, block: CodeBlock) -> &mut Self {}
        pub fn add_doc_block(&mut self, block: CodeBlock) -> &mut Self {}
        pub fn add_enum_constant(&mut self, name: &str, body: TypeSpec) -> &mut Self {}
        pub fn add_modifiers(&mut self, modifiers: impl IntoIterator<Item = Modifier>) -> &mut Self {}
        pub fn add_superinterface(&mut self, ty: TypeName) -> &mut Self {}
        pub fn superclass(&mut self, ty: TypeName) -> &mut Self {}
        pub fn build(self) -> TypeSpec {}
    }
}

pub mod property_spec {
    use super::*;

    pub struct PropertySpec;
    pub struct Builder;

    impl PropertySpec {
        pub fn builder(
            name: &str,
            ty: TypeName,
            #[bardgen(default = "[]")] modifiers: impl IntoIterator<Item = Modifier>,
        ) -> Builder {
        }

        pub fn to_builder(&self) -> Builder {}
    }

    impl Builder {
        pub fn add_annotation_spec(&mut self, annotation: AnnotationSpec) -> &mut Self {}
        pub fn getter_spec(&mut self, getter: FunSpec) -> &mut Self {}
        pub fn setter_spec(&mut self, setter: FunSpec) -> &mut Self {}
        pub fn delegate_block(&mut self, block: CodeBlock) -> &mut Self {}
        pub fn initializer_block(&mut self, block: CodeBlock) -> &mut Self {}
        pub fn add_doc_block(&mut self, block: CodeBlock) -> &mut Self {}
        pub fn add_modifiers(&mut self, modifiers: impl IntoIterator<Item = Modifier>) -> &mut Self {}
        pub fn mutable(&mut self, mutable: bool) -> &mut Self {}
        pub fn build(self) -> PropertySpec {}
    }
}

pub mod fun_spec {
    use super::*;

    pub struct FunSpec;
    pub struct Builder;

    impl FunSpec {
        pub fn builder(name: &str) -> Builder {}
        pub fn constructor_builder() -> Builder {}
        pub fn getter_builder() -> Builder {}
        pub fn setter_builder() -> Builder {}
        pub fn overriding(member: MemberName) -> Builder {}

        pub fn to_builder(&self) -> Builder {}
    }

    impl Builder {
        pub fn add_annotation_spec(&mut self, annotation: AnnotationSpec) -> &mut Self {}
        pub fn add_parameter_spec(&mut self, parameter: ParameterSpec) -> &mut Self {}
        pub fn add_code_block(&mut self, block: CodeBlock) -> &mut Self {}
        pub fn add_doc_block(&mut self, block: CodeBlock) -> &mut Self {}
        pub fn add_statement(&mut self, format: &str, args: impl IntoIterator<Item = Arg>) -> &mut Self {}
        pub fn add_modifiers(&mut self, modifiers: impl IntoIterator<Item = Modifier>) -> &mut Self {}
        pub fn returns(&mut self, ty: TypeName) -> &mut Self {}
        pub fn build(self) -> FunSpec {}
    }
}

pub mod parameter_spec {
    use super::*;

    pub struct ParameterSpec;
    pub struct Builder;

    impl ParameterSpec {
        pub fn builder(
            name: &str,
            ty: TypeName,
            #[bardgen(default = "[]")] modifiers: impl IntoIterator<Item = Modifier>,
        ) -> Builder {
        }
        pub fn unnamed(ty: TypeName) -> ParameterSpec {}

        pub fn to_builder(&self) -> Builder {}
    }

    impl Builder {
        pub fn add_annotation_spec(&mut self, annotation: AnnotationSpec) -> &mut Self {}
        pub fn default_value_block(&mut self, block: CodeBlock) -> &mut Self {}
        pub fn add_doc_block(&mut self, block: CodeBlock) -> &mut Self {}
        pub fn add_modifiers(&mut self, modifiers: impl IntoIterator<Item = Modifier>) -> &mut Self {}
        pub fn build(self) -> ParameterSpec {}
    }
}

pub mod type_alias_spec {
    use super::*;

    pub struct TypeAliasSpec;
    pub struct Builder;

    impl TypeAliasSpec {
        pub fn builder(name: &str, ty: TypeName) -> Builder {}

        pub fn to_builder(&self) -> Builder {}
    }

    impl Builder {
        pub fn add_annotation_spec(&mut self, annotation: AnnotationSpec) -> &mut Self {}
        pub fn add_doc_block(&mut self, block: CodeBlock) -> &mut Self {}
        pub fn add_modifiers(&mut self, modifiers: impl IntoIterator<Item = Modifier>) -> &mut Self {}
        pub fn build(self) -> TypeAliasSpec {}
    }
}

pub mod annotation_spec {
    use super::*;

    pub struct AnnotationSpec;
    pub struct Builder;

    impl AnnotationSpec {
        pub fn builder(type_name: ClassName) -> Builder {}
        pub fn get(annotation: Annotation, #[bardgen(default = "false")] include_default_values: bool) -> AnnotationSpec {}

        pub fn to_builder(&self) -> Builder {}
    }

    impl Builder {
        pub fn add_member_block(&mut self, block: CodeBlock) -> &mut Self {}
        pub fn use_site_target(&mut self, target: &str) -> &mut Self {}
        pub fn build(self) -> AnnotationSpec {}
    }
}

pub mod code_block {
    use super::*;

    pub struct CodeBlock;
    pub struct Builder;

    impl CodeBlock {
        pub fn builder() -> Builder {}
        pub fn of(format: &str, args: impl IntoIterator<Item = Arg>) -> CodeBlock {}
        pub fn join(
            blocks: impl IntoIterator<Item = CodeBlock>,
            #[bardgen(default = "\", \"")] separator: &str,
        ) -> CodeBlock {
        }

        pub fn to_builder(&self) -> Builder {}
        pub fn is_empty(&self) -> bool {}
    }

    impl Builder {
        pub fn add(&mut self, format: &str, args: impl IntoIterator<Item = Arg>) -> &mut Self {}
        pub fn add_statement(&mut self, format: &str, args: impl IntoIterator<Item = Arg>) -> &mut Self {}
        pub fn add_block(&mut self, block: CodeBlock) -> &mut Self {}
        pub fn begin_control_flow(&mut self, control_flow: &str, args: impl IntoIterator<Item = Arg>) -> &mut Self {}
        pub fn end_control_flow(&mut self) -> &mut Self {}
        pub fn indent(&mut self) -> &mut Self {}
        pub fn unindent(&mut self) -> &mut Self {}
        pub fn build(self) -> CodeBlock {}
    }
}

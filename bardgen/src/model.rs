//! Reflective model of a target type family.
//!
//! Everything here is produced once per run by [`crate::extract`] and is
//! read-only afterwards.

use std::fmt;

use crate::registry::TargetType;

/// A type as seen by the generator.
///
/// Registered target types and their builders are recognized structurally so
/// the matcher can compare them; everything else is kept as source tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeRef {
    /// The built value of a registered target type (e.g. `TypeSpec`).
    Target(String),
    /// The `Builder` of a registered target type.
    Builder { target: String, module: String },
    /// `&T` or `&mut T`.
    Borrowed { mutable: bool, inner: Box<TypeRef> },
    /// A closure applied to a builder before it is finished: `impl FnOnce(&mut B)`.
    Configure(Box<TypeRef>),
    /// Any other type, as normalized source tokens.
    Other(String),
}

impl TypeRef {
    pub fn builder_of(target: &TargetType) -> Self {
        TypeRef::Builder {
            target: target.name.clone(),
            module: target.module.clone(),
        }
    }

    /// Strips any number of borrows.
    pub fn peeled(&self) -> &TypeRef {
        match self {
            TypeRef::Borrowed { inner, .. } => inner.peeled(),
            other => other,
        }
    }

    /// Name of the target type if this is a built value (not a borrow of one).
    pub fn as_target(&self) -> Option<&str> {
        match self {
            TypeRef::Target(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Target(name) => write!(f, "{name}"),
            TypeRef::Builder { module, .. } => write!(f, "{module}::Builder"),
            TypeRef::Borrowed { mutable: true, inner } => write!(f, "&mut {inner}"),
            TypeRef::Borrowed { mutable: false, inner } => write!(f, "&{inner}"),
            TypeRef::Configure(inner) => write!(f, "impl FnOnce(&mut {inner})"),
            TypeRef::Other(tokens) => write!(f, "{tokens}"),
        }
    }
}

/// How an operation takes `self`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Receiver {
    Ref,
    RefMut,
    Value,
}

/// Which scope of a target type an operation was discovered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpScope {
    /// Associated function of the target type without a receiver.
    Factory,
    /// Method of the target type itself.
    Instance,
    /// Method of the target type's `Builder`.
    Builder,
}

impl fmt::Display for OpScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpScope::Factory => write!(f, "factory function"),
            OpScope::Instance => write!(f, "instance method"),
            OpScope::Builder => write!(f, "builder method"),
        }
    }
}

/// A value parameter of an operation or a generated function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    /// Element type when `variadic` is set.
    pub ty: TypeRef,
    pub variadic: bool,
    /// Default expression, as source text.
    pub default: Option<String>,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            variadic: false,
            default: None,
        }
    }

    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    pub fn with_default(mut self, expr: impl Into<String>) -> Self {
        self.default = Some(expr.into());
        self
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

/// `#[deprecated]` data carried through the forwarding layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deprecation {
    pub since: Option<String>,
    /// Replacement hint.
    pub note: Option<String>,
}

/// A public callable discovered on a target type or its builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub name: String,
    pub scope: OpScope,
    pub receiver: Option<Receiver>,
    pub params: Vec<Param>,
    pub returns: Option<TypeRef>,
    pub deprecation: Option<Deprecation>,
    /// Set when the only value parameter is a registered target type taken by value.
    pub spec_param: Option<String>,
}

impl Operation {
    /// Whether the declared return type, borrows peeled, is `ty`.
    pub fn returns_peeled(&self, ty: &TypeRef) -> bool {
        self.returns.as_ref().is_some_and(|r| r.peeled() == ty)
    }
}

/// The extracted operations of one target type.
#[derive(Debug, Clone)]
pub struct TargetModel {
    pub target: TargetType,
    pub builder: TypeRef,
    pub factory: Vec<Operation>,
    pub instance: Vec<Operation>,
    pub mutators: Vec<Operation>,
}

impl TargetModel {
    pub fn name(&self) -> &str {
        &self.target.name
    }

    pub fn ty(&self) -> TypeRef {
        TypeRef::Target(self.target.name.clone())
    }

    pub fn operations(&self, scope: OpScope) -> &[Operation] {
        match scope {
            OpScope::Factory => &self.factory,
            OpScope::Instance => &self.instance,
            OpScope::Builder => &self.mutators,
        }
    }

    /// Builder methods that accept a fully built value of some target type.
    pub fn spec_typed_mutators(&self) -> impl Iterator<Item = &Operation> {
        self.mutators.iter().filter(|op| op.spec_param.is_some())
    }
}

/// All target models, in registry order.
#[derive(Debug, Clone)]
pub struct TypeFamily {
    pub targets: Vec<TargetModel>,
}

impl TypeFamily {
    pub fn get(&self, name: &str) -> Option<&TargetModel> {
        self.targets.iter().find(|t| t.target.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TargetModel> {
        self.targets.iter()
    }
}

//! Reflective model extraction: binds every registered target type to its
//! manifest module and reads the public operations it exposes.

use log::{debug, info};
use quote::ToTokens;
use syn::visit_mut::{self, VisitMut};
use syn::{
    Attribute, Expr, ExprLit, FnArg, GenericArgument, ImplItem, ImplItemFn, Item, ItemImpl, Lit, LitStr, Meta,
    Pat, PathArguments, Type, TypeParamBound, TypePath, Visibility,
};

use crate::errors::ConfigError;
use crate::manifest::Manifest;
use crate::model::{Deprecation, OpScope, Operation, Param, Receiver, TargetModel, TypeFamily, TypeRef};
use crate::registry::{Registry, TargetType};

/// Extracts the operations of every registered type, in registry order.
///
/// Fails on the first type that breaks the manifest conventions; no type is skipped.
pub fn extract(registry: &Registry, manifest: &Manifest) -> Result<TypeFamily, ConfigError> {
    let mut targets = Vec::with_capacity(registry.len());
    for target in registry.iter() {
        let model = extract_target(registry, manifest, target)?;
        debug!(
            "{}: {} factory, {} instance, {} builder operations",
            target.name,
            model.factory.len(),
            model.instance.len(),
            model.mutators.len()
        );
        targets.push(model);
    }
    info!("extracted {} target types from {}", targets.len(), manifest.label());
    Ok(TypeFamily { targets })
}

/// The manifest items a target type resolved to.
struct Binding<'m> {
    type_impls: Vec<&'m ItemImpl>,
    builder_impls: Vec<&'m ItemImpl>,
}

fn bind<'m>(manifest: &'m Manifest, target: &TargetType) -> Result<Binding<'m>, ConfigError> {
    let module = manifest.module(&target.module).ok_or_else(|| ConfigError::MissingModule {
        target: target.name.clone(),
        module: target.module.clone(),
    })?;

    if !has_pub_struct(&module.items, &target.name) {
        return Err(ConfigError::MissingTargetStruct {
            target: target.name.clone(),
            module: target.module.clone(),
        });
    }
    if !has_pub_struct(&module.items, "Builder") {
        return Err(ConfigError::MissingBuilder {
            target: target.name.clone(),
            module: target.module.clone(),
        });
    }

    let type_impls = inherent_impls(&module.items, &target.name);
    if type_impls.is_empty() {
        return Err(ConfigError::MissingFactoryHolder {
            target: target.name.clone(),
        });
    }

    Ok(Binding {
        type_impls,
        builder_impls: inherent_impls(&module.items, "Builder"),
    })
}

fn extract_target(registry: &Registry, manifest: &Manifest, target: &TargetType) -> Result<TargetModel, ConfigError> {
    let binding = bind(manifest, target)?;
    let target_ty = TypeRef::Target(target.name.clone());
    let builder_ty = TypeRef::builder_of(target);

    let mut factory = Vec::new();
    let mut instance = Vec::new();
    let resolver = TypeResolver::new(registry, target, target_ty.clone());
    for method in binding.type_impls.iter().flat_map(|imp| pub_fns(imp)) {
        let scope = if method.sig.receiver().is_some() {
            OpScope::Instance
        } else {
            OpScope::Factory
        };
        if let Some(op) = extract_operation(method, scope, &resolver, target)? {
            match scope {
                OpScope::Factory => factory.push(op),
                _ => instance.push(op),
            }
        }
    }

    let mut mutators = Vec::new();
    let resolver = TypeResolver::new(registry, target, builder_ty.clone());
    for method in binding.builder_impls.iter().flat_map(|imp| pub_fns(imp)) {
        if method.sig.receiver().is_none() {
            continue;
        }
        if let Some(op) = extract_operation(method, OpScope::Builder, &resolver, target)? {
            mutators.push(op);
        }
    }

    let finishes = mutators
        .iter()
        .any(|op| op.name == "build" && op.params.is_empty() && op.returns.as_ref() == Some(&target_ty));
    if !finishes {
        return Err(ConfigError::MissingBuildMethod {
            target: target.name.clone(),
            module: target.module.clone(),
        });
    }

    Ok(TargetModel {
        target: target.clone(),
        builder: builder_ty,
        factory,
        instance,
        mutators,
    })
}

fn has_pub_struct(items: &[Item], name: &str) -> bool {
    items
        .iter()
        .any(|item| matches!(item, Item::Struct(s) if s.ident == name && matches!(s.vis, Visibility::Public(_))))
}

fn inherent_impls<'m>(items: &'m [Item], self_name: &str) -> Vec<&'m ItemImpl> {
    items
        .iter()
        .filter_map(|item| match item {
            Item::Impl(imp) if imp.trait_.is_none() => Some(imp),
            _ => None,
        })
        .filter(|imp| match imp.self_ty.as_ref() {
            Type::Path(tp) if tp.qself.is_none() => tp.path.segments.last().is_some_and(|s| s.ident == self_name),
            _ => false,
        })
        .collect()
}

fn pub_fns(imp: &ItemImpl) -> impl Iterator<Item = &ImplItemFn> {
    imp.items.iter().filter_map(|item| match item {
        ImplItem::Fn(f) if matches!(f.vis, Visibility::Public(_)) => Some(f),
        _ => None,
    })
}

fn extract_operation(
    method: &ImplItemFn,
    scope: OpScope,
    resolver: &TypeResolver<'_>,
    target: &TargetType,
) -> Result<Option<Operation>, ConfigError> {
    let sig = &method.sig;
    let name = sig.ident.to_string();
    if !sig.generics.params.is_empty() {
        debug!("{}: skipping generic {scope} `{name}`", target.name);
        return Ok(None);
    }

    let bad_attribute = |message: String| ConfigError::BadAttribute {
        target: target.name.clone(),
        operation: name.clone(),
        message,
    };

    let receiver = sig.receiver().map(|r| match (&r.reference, &r.mutability) {
        (Some(_), Some(_)) => Receiver::RefMut,
        (Some(_), None) => Receiver::Ref,
        (None, _) => Receiver::Value,
    });

    let mut params = Vec::new();
    for input in &sig.inputs {
        let FnArg::Typed(pat_type) = input else {
            continue;
        };
        let Pat::Ident(pat_ident) = pat_type.pat.as_ref() else {
            return Err(ConfigError::UnnamedParameter {
                target: target.name.clone(),
                operation: name.clone(),
            });
        };
        let param_name = pat_ident.ident.to_string();
        let mut param = match variadic_item(&pat_type.ty) {
            Some(item) => Param::new(param_name, resolver.resolve(item)).variadic(),
            None => Param::new(param_name, resolver.resolve(&pat_type.ty)),
        };
        param.default = default_value(&pat_type.attrs).map_err(|e| bad_attribute(e.to_string()))?;
        params.push(param);
    }

    let returns = match &sig.output {
        syn::ReturnType::Default => None,
        syn::ReturnType::Type(_, ty) => Some(resolver.resolve(ty)),
    };
    let deprecation = deprecation(&method.attrs).map_err(|e| bad_attribute(e.to_string()))?;
    let spec_param = match params.as_slice() {
        [only] if !only.variadic => only.ty.as_target().map(str::to_string),
        _ => None,
    };

    Ok(Some(Operation {
        name,
        scope,
        receiver,
        params,
        returns,
        deprecation,
        spec_param,
    }))
}

/// `impl IntoIterator<Item = T>` yields `T`.
fn variadic_item(ty: &Type) -> Option<&Type> {
    let Type::ImplTrait(impl_trait) = ty else {
        return None;
    };
    let mut bounds = impl_trait.bounds.iter().filter_map(|b| match b {
        TypeParamBound::Trait(t) => Some(t),
        _ => None,
    });
    let bound = bounds.next()?;
    if bounds.next().is_some() {
        return None;
    }
    let segment = bound.path.segments.last()?;
    if segment.ident != "IntoIterator" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    args.args.iter().find_map(|arg| match arg {
        GenericArgument::AssocType(assoc) if assoc.ident == "Item" => Some(&assoc.ty),
        _ => None,
    })
}

/// Reads `#[bardgen(default = "<expr>")]`.
fn default_value(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut default = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("bardgen")) {
        attr.parse_nested_meta(|meta| {
            if !meta.path.is_ident("default") {
                return Err(meta.error("unsupported bardgen attribute, expected `default`"));
            }
            let lit: LitStr = meta.value()?.parse()?;
            lit.parse::<Expr>()?;
            default = Some(lit.value());
            Ok(())
        })?;
    }
    Ok(default)
}

fn deprecation(attrs: &[Attribute]) -> syn::Result<Option<Deprecation>> {
    let Some(attr) = attrs.iter().find(|a| a.path().is_ident("deprecated")) else {
        return Ok(None);
    };
    let mut deprecation = Deprecation::default();
    match &attr.meta {
        Meta::Path(_) => {}
        Meta::NameValue(nv) => deprecation.note = Some(string_literal(&nv.value)?),
        Meta::List(_) => attr.parse_nested_meta(|meta| {
            let value: LitStr = meta.value()?.parse()?;
            if meta.path.is_ident("since") {
                deprecation.since = Some(value.value());
            } else if meta.path.is_ident("note") {
                deprecation.note = Some(value.value());
            } else {
                return Err(meta.error("expected `since` or `note`"));
            }
            Ok(())
        })?,
    }
    Ok(Some(deprecation))
}

fn string_literal(expr: &Expr) -> syn::Result<String> {
    match expr {
        Expr::Lit(ExprLit { lit: Lit::Str(s), .. }) => Ok(s.value()),
        other => Err(syn::Error::new_spanned(other, "expected a string literal")),
    }
}

/// Maps manifest types onto [`TypeRef`]s, relative to one module and one impl block.
struct TypeResolver<'a> {
    registry: &'a Registry,
    home: &'a TargetType,
    self_ty: TypeRef,
}

impl<'a> TypeResolver<'a> {
    fn new(registry: &'a Registry, home: &'a TargetType, self_ty: TypeRef) -> Self {
        Self {
            registry,
            home,
            self_ty,
        }
    }

    fn resolve(&self, ty: &Type) -> TypeRef {
        match ty {
            Type::Reference(r) => TypeRef::Borrowed {
                mutable: r.mutability.is_some(),
                inner: Box::new(self.resolve(&r.elem)),
            },
            Type::Paren(p) => self.resolve(&p.elem),
            Type::Group(g) => self.resolve(&g.elem),
            Type::Path(tp) if tp.qself.is_none() => self.resolve_path(&tp.path).unwrap_or_else(|| self.other(ty)),
            _ => self.other(ty),
        }
    }

    fn resolve_path(&self, path: &syn::Path) -> Option<TypeRef> {
        let last = path.segments.last()?;
        if !last.arguments.is_none() {
            return None;
        }
        let len = path.segments.len();
        if len == 1 && last.ident == "Self" {
            return Some(self.self_ty.clone());
        }
        if last.ident == "Builder" {
            let owner = if len == 1 {
                self.home
            } else {
                self.registry.by_module(&path.segments[len - 2].ident.to_string())?
            };
            return Some(TypeRef::builder_of(owner));
        }
        self.registry
            .get(&last.ident.to_string())
            .map(|t| TypeRef::Target(t.name.clone()))
    }

    /// Keeps an unrecognized type as tokens, with `Self` and the bare `Builder`
    /// spelled out so the type stays valid outside its module.
    fn other(&self, ty: &Type) -> TypeRef {
        let mut ty = ty.clone();
        let mut qualify = Qualify {
            self_path: syn::parse_str(&self.self_ty.to_string()).ok(),
            builder_path: syn::parse_str(&format!("{}::Builder", self.home.module)).ok(),
        };
        qualify.visit_type_mut(&mut ty);
        TypeRef::Other(ty.to_token_stream().to_string())
    }
}

struct Qualify {
    self_path: Option<TypePath>,
    builder_path: Option<TypePath>,
}

impl VisitMut for Qualify {
    fn visit_type_path_mut(&mut self, tp: &mut TypePath) {
        if tp.qself.is_none()
            && tp.path.segments.len() == 1
            && tp.path.segments[0].arguments.is_none()
        {
            let ident = &tp.path.segments[0].ident;
            let replacement = if ident == "Self" {
                self.self_path.clone()
            } else if ident == "Builder" {
                self.builder_path.clone()
            } else {
                None
            };
            if let Some(replacement) = replacement {
                *tp = replacement;
                return;
            }
        }
        visit_mut::visit_type_path_mut(self, tp);
    }
}

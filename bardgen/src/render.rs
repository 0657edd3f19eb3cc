//! Turns generated units into formatted Rust source and writes them out.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::Ident;
use tempfile::NamedTempFile;

use crate::assemble::{ExtensionTrait, GENERATED_MARKER, GeneratedUnit};
use crate::errors::GenError;
use crate::model::{Deprecation, Param, Receiver, TypeRef};
use crate::synth::{ArgValue, Body, Call, Callee, EXPANDED_SUFFIX, GeneratedFunction};

/// Name of the module file declaring every unit.
pub const MOD_FILE: &str = "mod.rs";

/// One formatted output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub file_name: String,
    pub contents: String,
}

/// Renders every unit plus the `mod.rs` that re-exports them.
pub fn render_all(units: &[GeneratedUnit]) -> Result<Vec<RenderedFile>, GenError> {
    let mut files = Vec::with_capacity(units.len() + 1);
    for unit in units {
        files.push(RenderedFile {
            file_name: format!("{}.rs", unit.name()),
            contents: render_unit(unit)?,
        });
    }
    files.push(RenderedFile {
        file_name: MOD_FILE.to_string(),
        contents: render_mod(units)?,
    });
    Ok(files)
}

/// Renders one unit as a formatted source file.
pub fn render_unit(unit: &GeneratedUnit) -> Result<String, GenError> {
    let name = unit.name();
    let fail = |source: syn::Error| GenError::Render {
        unit: name.to_string(),
        source,
    };

    let header = format!(" {}", unit.header);
    let namespace: syn::Path = syn::parse_str(&unit.namespace).map_err(fail)?;
    let siblings = unit
        .depends_on
        .iter()
        .map(|flavor| ident(flavor.unit_name()))
        .collect::<syn::Result<Vec<_>>>()
        .map_err(fail)?;

    let mut items = Vec::new();
    for function in &unit.functions {
        items.push(free_function(function).map_err(fail)?);
    }
    for ext in &unit.traits {
        items.push(extension_trait(ext).map_err(fail)?);
    }

    let output = quote! {
        #![doc = #header]
        #![allow(deprecated, unused_imports)]

        use #namespace::*;
        #(use super::#siblings::*;)*

        #(#items)*
    };
    format_file(output).map_err(fail)
}

/// Renders the `mod.rs` declaring and re-exporting every unit.
pub fn render_mod(units: &[GeneratedUnit]) -> Result<String, GenError> {
    let fail = |source: syn::Error| GenError::Render {
        unit: "mod".to_string(),
        source,
    };
    let header = format!(" {GENERATED_MARKER}. Do not edit manually; rerun the generator instead.");
    let modules = units
        .iter()
        .map(|unit| ident(unit.name()))
        .collect::<syn::Result<Vec<_>>>()
        .map_err(fail)?;

    let output = quote! {
        #![doc = #header]

        #(pub mod #modules;)*

        #(pub use #modules::*;)*
    };
    format_file(output).map_err(fail)
}

fn format_file(tokens: TokenStream) -> syn::Result<String> {
    let file: syn::File = syn::parse2(tokens)?;
    Ok(prettyplease::unparse(&file))
}

fn ident(name: &str) -> syn::Result<Ident> {
    syn::parse_str(name)
}

fn type_tokens(ty: &TypeRef) -> syn::Result<TokenStream> {
    Ok(match ty {
        TypeRef::Target(name) => ident(name)?.into_token_stream(),
        TypeRef::Builder { module, .. } => {
            let module = ident(module)?;
            quote!(#module::Builder)
        }
        TypeRef::Borrowed { mutable, inner } => {
            let inner = type_tokens(inner)?;
            if *mutable { quote!(&mut #inner) } else { quote!(&#inner) }
        }
        TypeRef::Configure(inner) => {
            let inner = type_tokens(inner)?;
            quote!(impl FnOnce(&mut #inner))
        }
        TypeRef::Other(tokens) => syn::parse_str::<syn::Type>(tokens)?.into_token_stream(),
    })
}

fn param_tokens(param: &Param) -> syn::Result<TokenStream> {
    let name = ident(&param.name)?;
    let ty = type_tokens(&param.ty)?;
    Ok(if param.variadic {
        quote!(#name: impl IntoIterator<Item = #ty>)
    } else {
        quote!(#name: #ty)
    })
}

fn receiver_tokens(receiver: Receiver) -> TokenStream {
    match receiver {
        Receiver::Ref => quote!(&self),
        Receiver::RefMut => quote!(&mut self),
        Receiver::Value => quote!(self),
    }
}

fn deprecation_tokens(deprecation: Option<&Deprecation>) -> TokenStream {
    let Some(deprecation) = deprecation else {
        return TokenStream::new();
    };
    match (&deprecation.since, &deprecation.note) {
        (Some(since), Some(note)) => quote!(#[deprecated(since = #since, note = #note)]),
        (Some(since), None) => quote!(#[deprecated(since = #since)]),
        (None, Some(note)) => quote!(#[deprecated(note = #note)]),
        (None, None) => quote!(#[deprecated]),
    }
}

fn call_tokens(call: &Call) -> syn::Result<TokenStream> {
    let args = call
        .args
        .iter()
        .map(|arg| match &arg.value {
            ArgValue::Param(name) => ident(name).map(ToTokens::into_token_stream),
            ArgValue::Nested(nested) => call_tokens(nested),
        })
        .collect::<syn::Result<Vec<_>>>()?;

    Ok(match &call.callee {
        Callee::Associated { owner, name } => {
            let owner = ident(owner)?;
            let name = ident(name)?;
            quote!(#owner::#name(#(#args),*))
        }
        Callee::SelfMethod { name } => {
            let name = ident(name)?;
            quote!(self.#name(#(#args),*))
        }
        Callee::Generated { name, expanded } => {
            let name = if *expanded {
                ident(&format!("{name}{EXPANDED_SUFFIX}"))?
            } else {
                ident(name)?
            };
            quote!(#name(#(#args),*))
        }
    })
}

fn body_tokens(body: &Body) -> syn::Result<TokenStream> {
    Ok(match body {
        Body::Forward(call) => call_tokens(call)?,
        Body::Build { construct, config } => {
            let construct = call_tokens(construct)?;
            let config = ident(config)?;
            quote! {
                let mut builder = #construct;
                #config(&mut builder);
                builder.build()
            }
        }
    })
}

/// Signature pieces shared by every rendering of a function.
struct Signature {
    receiver: Option<TokenStream>,
    params: Vec<TokenStream>,
    returns: TokenStream,
    deprecated: TokenStream,
}

impl Signature {
    fn of(function: &GeneratedFunction, params: &[Param]) -> syn::Result<Self> {
        let returns = match &function.returns {
            Some(ty) => {
                let ty = type_tokens(ty)?;
                quote!(-> #ty)
            }
            None => TokenStream::new(),
        };
        Ok(Self {
            receiver: function.receiver.as_ref().map(|(r, _)| receiver_tokens(*r)),
            params: params.iter().map(param_tokens).collect::<syn::Result<_>>()?,
            returns,
            deprecated: deprecation_tokens(function.deprecation.as_ref()),
        })
    }

    fn inputs(&self) -> TokenStream {
        let params = &self.params;
        match &self.receiver {
            Some(receiver) => quote!(#receiver, #(#params),*),
            None => quote!(#(#params),*),
        }
    }
}

fn doc_lines(text: &str) -> Vec<String> {
    text.lines().map(|line| format!(" {line}")).collect()
}

/// Doc and body of the short form, which fills in the trailing defaults.
fn short_form(function: &GeneratedFunction) -> syn::Result<(Vec<String>, TokenStream)> {
    let split = function.required_len();
    let full = ident(&function.full_name())?;
    let mut args = Vec::with_capacity(function.params.len());
    for param in &function.params[..split] {
        args.push(ident(&param.name)?.into_token_stream());
    }
    let mut defaults = Vec::new();
    for param in &function.params[split..] {
        let expr = param.default.as_deref().unwrap_or_default();
        args.push(syn::parse_str::<syn::Expr>(expr)?.into_token_stream());
        defaults.push(format!("`{}`", param.name));
    }

    let (call, link) = if function.receiver.is_some() {
        (quote!(self.#full(#(#args),*)), format!("Self::{}", function.full_name()))
    } else {
        (quote!(#full(#(#args),*)), function.full_name())
    };
    let doc = format!(
        "{}\n\nUses the default for {}; [`{link}`] takes every parameter.",
        function.doc,
        defaults.join(", "),
    );
    Ok((doc_lines(&doc), call))
}

fn free_function(function: &GeneratedFunction) -> syn::Result<TokenStream> {
    let name = ident(&function.name)?;
    let body = body_tokens(&function.body)?;
    let full = Signature::of(function, &function.params)?;
    let Signature {
        returns, deprecated, ..
    } = &full;
    let inputs = full.inputs();

    if !function.has_short_form() {
        let docs = doc_lines(&function.doc);
        return Ok(quote! {
            #(#[doc = #docs])*
            #deprecated
            pub fn #name(#inputs) #returns {
                #body
            }
        });
    }

    let full_name = ident(&function.full_name())?;
    let short = Signature::of(function, &function.params[..function.required_len()])?;
    let short_inputs = short.inputs();
    let (short_docs, short_body) = short_form(function)?;
    let docs = doc_lines(&function.doc);
    Ok(quote! {
        #(#[doc = #short_docs])*
        #deprecated
        pub fn #name(#short_inputs) #returns {
            #short_body
        }

        #(#[doc = #docs])*
        #deprecated
        pub fn #full_name(#inputs) #returns {
            #body
        }
    })
}

fn extension_trait(ext: &ExtensionTrait) -> syn::Result<TokenStream> {
    let trait_name = ident(&ext.name)?;
    let receiver = type_tokens(&ext.receiver)?;
    let mut declarations = Vec::new();
    let mut implementations = Vec::new();

    for function in &ext.functions {
        let full_name = ident(&function.full_name())?;
        let full = Signature::of(function, &function.params)?;
        let Signature {
            returns, deprecated, ..
        } = &full;
        let inputs = full.inputs();
        let body = body_tokens(&function.body)?;
        let docs = doc_lines(&function.doc);

        if function.has_short_form() {
            let name = ident(&function.name)?;
            let short = Signature::of(function, &function.params[..function.required_len()])?;
            let short_inputs = short.inputs();
            let (short_docs, short_body) = short_form(function)?;
            // A provided method moving `self` needs a sized receiver.
            let sized = match function.receiver {
                Some((Receiver::Value, _)) => quote!(where Self: Sized),
                _ => TokenStream::new(),
            };
            declarations.push(quote! {
                #(#[doc = #short_docs])*
                #deprecated
                fn #name(#short_inputs) #returns #sized {
                    #short_body
                }
            });
        }
        declarations.push(quote! {
            #(#[doc = #docs])*
            #deprecated
            fn #full_name(#inputs) #returns;
        });
        implementations.push(quote! {
            fn #full_name(#inputs) #returns {
                #body
            }
        });
    }

    let target = &ext.target;
    let subject = match ext.receiver.peeled() {
        TypeRef::Builder { .. } => format!(" Generated methods on the builder of [`{target}`]."),
        _ => format!(" Generated methods on [`{target}`]."),
    };
    Ok(quote! {
        #[doc = #subject]
        pub trait #trait_name {
            #(#declarations)*
        }

        impl #trait_name for #receiver {
            #(#implementations)*
        }
    })
}

/// What a write pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub written: Vec<PathBuf>,
    pub unchanged: Vec<PathBuf>,
    pub removed: Vec<PathBuf>,
}

/// Destination directory of the generated files.
#[derive(Debug, Clone)]
pub struct OutputDir {
    path: PathBuf,
}

impl OutputDir {
    /// Creates the directory if needed.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, GenError> {
        let path = path.into();
        fs::create_dir_all(&path).map_err(|e| GenError::io(&path, e))?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes generated files not in `keep`. Hand-written files are left alone.
    pub fn clear_generated(&self, keep: &HashSet<&str>) -> Result<Vec<PathBuf>, GenError> {
        let mut removed = Vec::new();
        let entries = fs::read_dir(&self.path).map_err(|e| GenError::io(&self.path, e))?;
        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "rs"))
            .collect();
        paths.sort();

        for path in paths {
            let kept = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| keep.contains(n));
            if kept || !is_generated(&path)? {
                continue;
            }
            fs::remove_file(&path).map_err(|e| GenError::io(&path, e))?;
            debug!("removed stale {}", path.display());
            removed.push(path);
        }
        Ok(removed)
    }

    /// Writes every file whose contents changed, then removes stale generated files.
    ///
    /// Each file is written to a temporary file in the directory and renamed
    /// into place, so a reader never sees a partial file. If a write fails,
    /// every generated file is removed so the directory never looks complete.
    pub fn write(&self, files: &[RenderedFile]) -> Result<WriteSummary, GenError> {
        let mut summary = WriteSummary::default();
        for file in files {
            let path = self.path.join(&file.file_name);
            let unchanged = fs::read_to_string(&path).is_ok_and(|existing| existing == file.contents);
            if unchanged {
                summary.unchanged.push(path);
                continue;
            }
            if let Err(err) = self.persist(&path, &file.contents) {
                if let Err(cleanup) = self.clear_generated(&HashSet::new()) {
                    warn!("could not clear {} after a failed write: {cleanup}", self.path.display());
                }
                return Err(err);
            }
            summary.written.push(path);
        }

        let keep: HashSet<&str> = files.iter().map(|f| f.file_name.as_str()).collect();
        summary.removed = self.clear_generated(&keep)?;
        info!(
            "{}: {} written, {} unchanged, {} removed",
            self.path.display(),
            summary.written.len(),
            summary.unchanged.len(),
            summary.removed.len()
        );
        Ok(summary)
    }

    fn persist(&self, path: &Path, contents: &str) -> Result<(), GenError> {
        let mut tmp = NamedTempFile::new_in(&self.path).map_err(|e| GenError::io(&self.path, e))?;
        tmp.write_all(contents.as_bytes())
            .and_then(|()| tmp.flush())
            .map_err(|e| GenError::io(tmp.path(), e))?;
        tmp.persist(path).map_err(|e| GenError::io(path, e.error))?;
        Ok(())
    }
}

fn is_generated(path: &Path) -> Result<bool, GenError> {
    let file = File::open(path).map_err(|e| GenError::io(path, e))?;
    let mut first = String::new();
    BufReader::new(file)
        .read_line(&mut first)
        .map_err(|e| GenError::io(path, e))?;
    Ok(first.contains(GENERATED_MARKER))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Flavor;
    use crate::synth::{Arg, Origin};

    fn builder_of(target: &str, module: &str) -> TypeRef {
        TypeRef::Builder {
            target: target.into(),
            module: module.into(),
        }
    }

    fn create_a() -> GeneratedFunction {
        GeneratedFunction {
            name: "create_a".into(),
            target: "TypeA".into(),
            origin: Origin {
                flavor: Flavor::Builders,
                key: "new_a".into(),
                rule_index: 0,
            },
            receiver: None,
            params: vec![
                Param::new("name", TypeRef::Other("& str".into())),
                Param::new(
                    "config",
                    TypeRef::Configure(Box::new(builder_of("TypeA", "type_a"))),
                )
                .with_default("|_| {}"),
            ],
            returns: Some(TypeRef::Target("TypeA".into())),
            body: Body::Build {
                construct: Call {
                    callee: Callee::Associated {
                        owner: "TypeA".into(),
                        name: "new_a".into(),
                    },
                    args: vec![Arg {
                        name: "name".into(),
                        value: ArgValue::Param("name".into()),
                    }],
                },
                config: "config".into(),
            },
            deprecation: None,
            reference: Some("new_a".into()),
            doc: "Builds a [`TypeA`].".into(),
        }
    }

    fn unit(functions: Vec<GeneratedFunction>, traits: Vec<ExtensionTrait>) -> GeneratedUnit {
        GeneratedUnit {
            flavor: Flavor::Builders,
            header: format!("{GENERATED_MARKER} from the `builders` rule table."),
            namespace: "poet".into(),
            depends_on: Vec::new(),
            functions,
            traits,
        }
    }

    fn normalized(source: &str) -> String {
        source.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_header_is_the_first_line() {
        let source = render_unit(&unit(vec![create_a()], Vec::new())).unwrap();
        let first = source.lines().next().unwrap();
        assert!(first.starts_with("//!"));
        assert!(first.contains(GENERATED_MARKER));
        assert!(source.contains("use poet::*;"));
    }

    #[test]
    fn test_short_and_full_forms() {
        let source = normalized(&render_unit(&unit(vec![create_a()], Vec::new())).unwrap());
        assert!(source.contains("pub fn create_a(name: &str) -> TypeA { create_a_with(name, |_| {}) }"));
        assert!(source.contains("pub fn create_a_with(name: &str, config: impl FnOnce(&mut type_a::Builder)) -> TypeA {"));
        assert!(source.contains("let mut builder = TypeA::new_a(name); config(&mut builder); builder.build()"));
    }

    #[test]
    fn test_deprecation_is_rendered() {
        let mut function = create_a();
        function.params.pop();
        function.body = Body::Forward(Call {
            callee: Callee::Associated {
                owner: "TypeA".into(),
                name: "new_a".into(),
            },
            args: Vec::new(),
        });
        function.deprecation = Some(Deprecation {
            since: Some("0.3.0".into()),
            note: Some("use `create_a`".into()),
        });
        let source = normalized(&render_unit(&unit(vec![function], Vec::new())).unwrap());
        assert!(source.contains(r#"#[deprecated(since = "0.3.0", note = "use `create_a`")] pub fn create_a(name: &str)"#));
    }

    #[test]
    fn test_variadic_parameter_is_forwarded_as_is() {
        let mut function = create_a();
        function.params = vec![Param::new("parts", TypeRef::Other("String".into())).variadic()];
        function.returns = None;
        function.body = Body::Forward(Call {
            callee: Callee::Associated {
                owner: "TypeA".into(),
                name: "of".into(),
            },
            args: vec![Arg {
                name: "parts".into(),
                value: ArgValue::Param("parts".into()),
            }],
        });
        let source = normalized(&render_unit(&unit(vec![function], Vec::new())).unwrap());
        assert!(source.contains("pub fn create_a(parts: impl IntoIterator<Item = String>) { TypeA::of(parts) }"));
    }

    #[test]
    fn test_extension_trait() {
        let mut adder = create_a();
        adder.name = "add_a".into();
        adder.receiver = Some((Receiver::RefMut, builder_of("TypeB", "type_b")));
        adder.returns = Some(TypeRef::Borrowed {
            mutable: true,
            inner: Box::new(builder_of("TypeB", "type_b")),
        });
        adder.body = Body::Forward(Call {
            callee: Callee::SelfMethod {
                name: "add_a_spec".into(),
            },
            args: vec![Arg {
                name: "a".into(),
                value: ArgValue::Nested(Box::new(Call {
                    callee: Callee::Generated {
                        name: "create_a".into(),
                        expanded: true,
                    },
                    args: vec![
                        Arg {
                            name: "name".into(),
                            value: ArgValue::Param("name".into()),
                        },
                        Arg {
                            name: "config".into(),
                            value: ArgValue::Param("config".into()),
                        },
                    ],
                })),
            }],
        });
        let ext = ExtensionTrait {
            name: "TypeBBuilderExt".into(),
            receiver: builder_of("TypeB", "type_b"),
            target: "TypeB".into(),
            functions: vec![adder],
        };
        let mut unit = unit(Vec::new(), vec![ext]);
        unit.flavor = Flavor::Adders;
        unit.depends_on = vec![Flavor::Builders];

        let source = normalized(&render_unit(&unit).unwrap());
        assert!(source.contains("use super::builders::*;"));
        assert!(source.contains("pub trait TypeBBuilderExt {"));
        assert!(source.contains("fn add_a(&mut self, name: &str) -> &mut type_b::Builder { self.add_a_with(name, |_| {}) }"));
        assert!(source.contains("impl TypeBBuilderExt for type_b::Builder {"));
        assert!(source.contains("self.add_a_spec(create_a_with(name, config))"));
    }

    fn consuming_adder() -> ExtensionTrait {
        let mut adder = create_a();
        adder.name = "add_a".into();
        adder.receiver = Some((Receiver::Value, builder_of("TypeB", "type_b")));
        adder.returns = Some(builder_of("TypeB", "type_b"));
        adder.body = Body::Forward(Call {
            callee: Callee::SelfMethod {
                name: "add_a_spec".into(),
            },
            args: vec![Arg {
                name: "a".into(),
                value: ArgValue::Nested(Box::new(Call {
                    callee: Callee::Generated {
                        name: "create_a".into(),
                        expanded: true,
                    },
                    args: vec![
                        Arg {
                            name: "name".into(),
                            value: ArgValue::Param("name".into()),
                        },
                        Arg {
                            name: "config".into(),
                            value: ArgValue::Param("config".into()),
                        },
                    ],
                })),
            }],
        });
        ExtensionTrait {
            name: "TypeBBuilderExt".into(),
            receiver: builder_of("TypeB", "type_b"),
            target: "TypeB".into(),
            functions: vec![adder],
        }
    }

    #[test]
    fn test_consuming_short_form_requires_sized_self() {
        let source = normalized(&render_unit(&unit(Vec::new(), vec![consuming_adder()])).unwrap());
        assert!(source.contains("fn add_a(self, name: &str) -> type_b::Builder where Self: Sized"));
        assert!(source.contains("{ self.add_a_with(name, |_| {}) }"));
        assert!(source.contains("self.add_a_spec(create_a_with(name, config))"));
    }

    #[test]
    fn test_borrowing_short_form_has_no_bound() {
        let mut ext = consuming_adder();
        ext.functions[0].receiver = Some((Receiver::RefMut, builder_of("TypeB", "type_b")));
        let source = normalized(&render_unit(&unit(Vec::new(), vec![ext])).unwrap());
        assert!(!source.contains("Self: Sized"));
        assert!(source.contains("[`Self::add_a_with`] takes every parameter."));
    }

    #[test]
    fn test_mod_file_reexports_units() {
        let source = render_mod(&[unit(Vec::new(), Vec::new())]).unwrap();
        assert!(source.lines().next().unwrap().contains(GENERATED_MARKER));
        let source = normalized(&source);
        assert!(source.contains("pub mod builders;"));
        assert!(source.contains("pub use builders::*;"));
    }

    #[test]
    fn test_write_replaces_only_generated_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = OutputDir::create(dir.path().join("gen")).unwrap();
        fs::write(out.path().join("stale.rs"), format!("//! {GENERATED_MARKER} from an old run\n")).unwrap();
        fs::write(out.path().join("handwritten.rs"), "pub fn keep() {}\n").unwrap();

        let files = render_all(&[unit(vec![create_a()], Vec::new())]).unwrap();
        let summary = out.write(&files).unwrap();

        assert_eq!(summary.written.len(), 2);
        assert_eq!(summary.removed, vec![out.path().join("stale.rs")]);
        assert!(out.path().join("handwritten.rs").exists());
        assert!(out.path().join("builders.rs").exists());

        let again = out.write(&files).unwrap();
        assert!(again.written.is_empty());
        assert_eq!(again.unchanged.len(), 2);
    }

    #[test]
    fn test_failed_write_clears_generated_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = OutputDir::create(dir.path()).unwrap();
        fs::create_dir(out.path().join("getters.rs")).unwrap();
        fs::write(out.path().join("handwritten.rs"), "pub fn keep() {}\n").unwrap();

        let mut getters = unit(Vec::new(), Vec::new());
        getters.flavor = Flavor::Getters;
        let files = render_all(&[unit(vec![create_a()], Vec::new()), getters]).unwrap();

        let err = out.write(&files).unwrap_err();
        assert!(matches!(err, GenError::Io { ref path, .. } if path.ends_with("getters.rs")));
        assert!(!out.path().join("builders.rs").exists());
        assert!(!out.path().join("mod.rs").exists());
        assert!(out.path().join("handwritten.rs").exists());
    }
}

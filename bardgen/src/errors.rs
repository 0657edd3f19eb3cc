use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::check::CompletenessReport;
use crate::rules::Flavor;

/// Top-level error type returned by the generator pipeline.
#[derive(Debug, Error)]
pub enum GenError {
    /// A registry entry or rule table is malformed.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A rule did not resolve to exactly one operation.
    #[error("resolution error: {0}")]
    Resolution(#[from] ResolutionError),

    /// Strict mode found operations no rule covers.
    #[error("incomplete rule tables:\n{0}")]
    Incomplete(CompletenessReport),

    /// The interface manifest could not be parsed.
    #[error("failed to parse manifest {label}: {source}")]
    Manifest {
        label: String,
        #[source]
        source: syn::Error,
    },

    /// A generated unit could not be turned into source text.
    #[error("failed to render unit `{unit}`: {source}")]
    Render {
        unit: String,
        #[source]
        source: syn::Error,
    },

    /// Reading a manifest or touching the output directory failed.
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl GenError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        GenError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Static configuration mistakes: the registry, the manifest conventions, or a rule table.
///
/// These are detected before any code is synthesized and always abort the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("target type `{0}` is registered more than once")]
    DuplicateTarget(String),

    #[error("manifest declares module `{module}` more than once")]
    DuplicateModule { module: String },

    #[error("target type `{target}`: manifest has no module `{module}`")]
    MissingModule { target: String, module: String },

    #[error("target type `{target}`: module `{module}` declares no `pub struct {target}`")]
    MissingTargetStruct { target: String, module: String },

    #[error("target type `{target}`: module `{module}` declares no `pub struct Builder`")]
    MissingBuilder { target: String, module: String },

    #[error("target type `{target}`: no inherent `impl {target}` block to act as factory holder")]
    MissingFactoryHolder { target: String },

    #[error("target type `{target}`: `{module}::Builder` has no public `build` method returning `{target}`")]
    MissingBuildMethod { target: String, module: String },

    #[error("target type `{target}`: operation `{operation}` has a parameter without a plain name")]
    UnnamedParameter { target: String, operation: String },

    #[error("target type `{target}`: operation `{operation}`: {message}")]
    BadAttribute {
        target: String,
        operation: String,
        message: String,
    },

    #[error("{flavor} table: rules declared for unregistered target type `{target}`")]
    UnknownTarget { flavor: Flavor, target: String },

    #[error("{flavor} table: target type `{target}` has more than one rule list")]
    DuplicateTableEntry { flavor: Flavor, target: String },

    #[error("{flavor} table, target `{target}`: key `{key}` is declared more than once")]
    DuplicateKey {
        flavor: Flavor,
        target: String,
        key: String,
    },

    #[error("{flavor} table, target `{target}`: rules `{first}` and `{second}` both generate `{name}`")]
    NameCollision {
        flavor: Flavor,
        target: String,
        name: String,
        first: String,
        second: String,
    },

    #[error("{flavor} table: {first} and {second} both generate the free function `{name}`")]
    SharedName {
        flavor: Flavor,
        name: String,
        first: String,
        second: String,
    },

    #[error("{flavor} table, target `{target}`: rule `{key}` is not a {expected} rule")]
    RuleKindMismatch {
        flavor: Flavor,
        target: String,
        key: String,
        expected: &'static str,
    },

    #[error("{flavor} table, target `{target}`: rule `{key}` generates `{name}`, which is not a valid identifier")]
    InvalidName {
        flavor: Flavor,
        target: String,
        key: String,
        name: String,
    },

    #[error(
        "{flavor} table, target `{target}`: rule `{key}` generates `{name}`, which would be shadowed by an inherent method of the same name"
    )]
    ShadowsInherent {
        flavor: Flavor,
        target: String,
        key: String,
        name: String,
    },

    #[error(
        "{flavor} table, target `{target}`: rule `{key}` forwards to `{operation}`, whose parameter `{parameter}` clashes with a generated parameter"
    )]
    ReservedParameter {
        flavor: Flavor,
        target: String,
        key: String,
        operation: String,
        parameter: String,
    },

    #[error("generated function `{name}` is produced by both {first} and {second}")]
    UnitCollision {
        name: String,
        first: String,
        second: String,
    },
}

/// A rule that does not resolve to exactly one operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("{flavor} table, target `{target}`, rule `{key}`: no operation matches ({expected}; {near_misses} same-named candidate(s) had the wrong shape)")]
    NoMatch {
        flavor: Flavor,
        target: String,
        key: String,
        expected: String,
        near_misses: usize,
    },

    #[error("{flavor} table, target `{target}`, rule `{key}`: {count} operations match ({expected}); refusing to pick one")]
    Ambiguous {
        flavor: Flavor,
        target: String,
        key: String,
        expected: String,
        count: usize,
    },
}

impl ResolutionError {
    /// Key of the rule that failed to resolve.
    pub fn key(&self) -> &str {
        match self {
            ResolutionError::NoMatch { key, .. } | ResolutionError::Ambiguous { key, .. } => key,
        }
    }

    /// Target type whose rule failed to resolve.
    pub fn target(&self) -> &str {
        match self {
            ResolutionError::NoMatch { target, .. } | ResolutionError::Ambiguous { target, .. } => target,
        }
    }
}

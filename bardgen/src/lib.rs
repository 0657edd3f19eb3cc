//! Build-time generator of ergonomic forwarding functions over builder-style APIs.
//!
//! `bardgen` reads an interface manifest describing a family of builder-style
//! types (the bundled one describes `poet`, a code-emission library), resolves
//! declarative rule tables against the operations those types expose, and
//! emits Rust source with one function per rule:
//!
//! - `builders`: `build_class(name)` / `build_class_with(name, |b| ..)` over
//!   `TypeSpec::class_builder(name)` + `build()`;
//! - `getters`: free functions over factories returning a built value;
//! - `modifiers`: `spec.modify(|b| ..)` over `to_builder()` + `build()`;
//! - `adders`: `builder.add_function(name)` building a `FunSpec` and passing it
//!   to `add_function_spec`.
//!
//! # Example
//!
//! ```no_run
//! let (generation, _) = bardgen::Generator::new()
//!     .target_crate("poet")
//!     .write_to("src/generated")?;
//! println!("{} functions", generation.function_count());
//! # Ok::<(), bardgen::GenError>(())
//! ```

pub mod assemble;
pub mod check;
pub mod errors;
pub mod extract;
pub mod manifest;
pub mod matcher;
pub mod model;
pub mod pipeline;
pub mod registry;
pub mod render;
pub mod rules;
pub mod synth;

pub use check::CompletenessReport;
pub use errors::{ConfigError, GenError, ResolutionError};
pub use pipeline::{Generation, Generator};
pub use registry::{Registry, TargetType};
pub use rules::{Flavor, RuleTable, RuleTables};

//! `build.rs` integration for bardgen.
//!
//! Generates the forwarding functions into `$OUT_DIR/bardgen` (or a chosen
//! directory) at build time, touching only files whose contents changed.
//!
//! # Example
//!
//! In your `build.rs`:
//!
//! ```ignore
//! fn main() {
//!     bardgen_build::generate()
//!         .target_crate("poet")
//!         .strict(true)
//!         .run()
//!         .expect("Failed to generate forwarding functions");
//! }
//! ```
//!
//! Then include the result:
//!
//! ```ignore
//! mod generated {
//!     include!(concat!(env!("OUT_DIR"), "/bardgen/mod.rs"));
//! }
//! ```

mod generator;

pub use generator::BuildGenerator;

/// Create a new build generator with default settings.
pub fn generate() -> BuildGenerator {
    BuildGenerator::new()
}

//! CLI command implementations.
//!
//! testalign has a single command, `validate`, which runs the route, content
//! and CI validators and reports the combined result.

pub mod validate;

pub use validate::{resolve_context, run_pipeline, run_validation, ValidationContext, ValidationOptions};

//! Orchestrates one generator run: configuration, extension hooks, and the
//! per-model task graph executed across a fork-join worker pool.
//!
//! Everything upstream of this crate (`sdkgen-model`, `sdkgen-symbols`,
//! `sdkgen-emit`) is a pure, single-model library with no notion of "a
//! run" spanning multiple models or exposing extension points; this crate
//! is where those concerns live, mirroring how `codegen/src/main.rs`
//! drives the teacher's single-model libraries end to end.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod hooks;
pub mod pipeline;

pub use config::{GeneratorConfig, PolicyConfig};
pub use error::{PipelineError, PipelineResult};
pub use hooks::HookRegistry;
pub use pipeline::{ModelOutput, ModelSource, Pipeline, ServiceOutput};

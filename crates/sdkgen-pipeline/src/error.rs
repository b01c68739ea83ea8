//! Pipeline-level errors: everything a model's task graph can fail with,
//! above the per-crate errors each stage already raises.

/// Errors raised orchestrating a model through the task graph.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Parsing the model source failed.
    #[error("failed to parse model: {0}")]
    Model(#[from] sdkgen_model::ModelError),
    /// Code emission failed for a service.
    #[error("failed to emit service: {0}")]
    Emit(#[from] sdkgen_emit::EmitError),
    /// The model declared no service shape to emit.
    #[error("model declares no service shape")]
    NoServiceShape,
    /// A named service filter matched no service in the model.
    #[error("requested service {0:?} not found in model")]
    ServiceNotFound(String),
    /// The issues bag recorded a problem under an `abort` policy.
    #[error("aborted: {0}")]
    Aborted(String),
    /// An opaque upstream failure (I/O, etc).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result alias for this crate.
pub type PipelineResult<T> = Result<T, PipelineError>;

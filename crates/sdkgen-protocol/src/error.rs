//! Errors raised while resolving an operation's protocol binding.

use sdkgen_model::ShapeId;

/// Errors raised by [`crate::resolve_protocol`] or [`crate::bind_operation`].
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The service carries none of the protocol traits this crate
    /// understands.
    #[error("service {0:?} declares no recognized protocol trait")]
    UnknownProtocol(ShapeId),

    /// An operation has no `@http` trait and the protocol has no default
    /// binding to fall back on.
    #[error("operation {0:?} has no usable HTTP binding")]
    MissingHttpBinding(ShapeId),

    /// A `@httpLabel` member's name doesn't appear as a `{label}` in the
    /// operation's URI template, or vice versa.
    #[error("URI template {uri:?} and httpLabel members disagree (missing label {label:?})")]
    LabelMismatch {
        /// The URI template text.
        uri: String,
        /// The unmatched label name.
        label: String,
    },

    /// A referenced shape is missing from the model.
    #[error("shape {0:?} referenced by the protocol binder is missing from the model")]
    UnknownShapeReference(ShapeId),
}

/// Result alias for this crate.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

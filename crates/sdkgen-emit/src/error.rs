//! Errors raised while emitting source for a service.

use sdkgen_model::ShapeId;

/// Errors raised by [`crate::generate_service`] and its sub-emitters.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    /// A shape referenced during emission is missing from the model.
    #[error("shape {0:?} referenced during emission is missing from the model")]
    UnknownShapeReference(ShapeId),

    /// The model has no service shape to emit a client for.
    #[error("model declares no service shape")]
    NoServiceShape,

    /// Protocol binding failed for an operation this emitter needs to emit.
    #[error("protocol binding failed: {0}")]
    Protocol(#[from] sdkgen_protocol::ProtocolError),

    /// Mixin/member resolution failed while walking a shape's members.
    #[error("symbol resolution failed: {0}")]
    Symbols(#[from] sdkgen_symbols::SymbolsError),

    /// Writing into the in-memory source buffer failed (infallible in
    /// practice for a `String` target, but `write!`/`writeln!` still
    /// return a `Result` we need to propagate).
    #[error("source buffer write failed: {0}")]
    Format(#[from] std::fmt::Error),

    /// An opaque failure from a collaborator this crate doesn't own.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result alias for this crate.
pub type EmitResult<T> = Result<T, EmitError>;

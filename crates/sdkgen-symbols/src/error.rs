//! Errors raised while querying the symbols provider.

use sdkgen_model::ShapeId;

/// Errors raised by [`crate::SymbolTable`].
#[derive(Debug, thiserror::Error)]
pub enum SymbolsError {
    /// A shape, member, or mixin referenced an id absent from the model.
    #[error("reference to unknown shape {0:?}")]
    UnknownShapeReference(ShapeId),

    /// `mixins` formed a cycle while flattening.
    #[error("mixin cycle detected at shape {0:?}")]
    MixinCycle(ShapeId),
}

/// Convenience result alias for this crate.
pub type SymbolsResult<T> = Result<T, SymbolsError>;

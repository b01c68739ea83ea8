//! Error types for JSON reading and model parsing.

use crate::shape_id::ShapeId;

/// Errors raised while reading or parsing a Smithy JSON model document.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The reader expected one kind of token and found another.
    #[error("expected {expected}, found {got}")]
    UnexpectedToken {
        /// What the reader expected.
        expected: String,
        /// What the reader actually saw.
        got: String,
    },

    /// A string literal was never closed with a matching quote.
    #[error("unterminated string starting at offset {0}")]
    UnterminatedString(usize),

    /// A numeric literal could not be represented as `f64`.
    #[error("number overflow parsing {0:?}")]
    NumberOverflow(String),

    /// The `smithy` version key was missing or not a supported `2.x` version.
    #[error("unsupported or missing smithy version: {0}")]
    UnsupportedVersion(String),

    /// A shape referenced an id that does not exist in the shape table.
    #[error("shape {0:?} references unknown shape {1:?}")]
    UnknownShapeReference(ShapeId, ShapeId),

    /// Two distinct absolute shape ids hashed to the same [`ShapeId`].
    #[error("hash collision between {0:?} and {1:?} (both hash to the same ShapeId)")]
    HashCollision(String, String),

    /// `mixins` formed a cycle.
    #[error("mixin cycle detected at shape {0:?}")]
    MixinCycle(ShapeId),

    /// A required property was missing from a shape object.
    #[error("shape {0:?} is missing required property {1:?}")]
    MissingProperty(String, &'static str),

    /// An unrecognized `type` discriminator was found for a shape.
    #[error("unknown shape type {0:?}")]
    UnknownShapeType(String),

    /// Raised under `abort` policy when an unknown shape-level property is seen.
    #[error("unknown property {1:?} on shape {0:?}")]
    UnknownProperty(String, String),

    /// Raised under `abort` policy when an unknown trait id is seen.
    #[error("unknown trait {1:?} applied to shape {0:?}")]
    UnknownTrait(String, String),

    /// `apply` targeted a shape that does not exist.
    #[error("apply targets unknown shape {0:?}")]
    ApplyTargetMissing(String),

    /// Catch-all for failures in trait payload parsing.
    #[error("failed to parse trait {trait_id:?} on {shape}: {source}")]
    TraitPayload {
        /// The shape the trait was applied to.
        shape: String,
        /// The trait id whose payload failed to parse.
        trait_id: String,
        /// Underlying cause.
        #[source]
        source: anyhow::Error,
    },
}

/// Convenience result alias for this crate.
pub type ModelResult<T> = Result<T, ModelError>;

//! The tagged shape-type hierarchy (spec §3 `ShapeType`).

use crate::shape_id::ShapeId;

/// Smithy's non-aggregate, non-service scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimpleType {
    /// `unit`
    Unit,
    /// `blob`
    Blob,
    /// `boolean`
    Boolean,
    /// `string`
    String,
    /// `byte`
    Byte,
    /// `short`
    Short,
    /// `integer`
    Integer,
    /// `long`
    Long,
    /// `float`
    Float,
    /// `double`
    Double,
    /// `bigInteger`
    BigInteger,
    /// `bigDecimal`
    BigDecimal,
    /// `timestamp`
    Timestamp,
    /// `document`
    Document,
}

impl SimpleType {
    /// Parse the Smithy `type` discriminator string for simple shapes.
    #[must_use]
    pub fn from_type_name(name: &str) -> Option<Self> {
        Some(match name {
            "unit" => Self::Unit,
            "blob" => Self::Blob,
            "boolean" => Self::Boolean,
            "string" => Self::String,
            "byte" => Self::Byte,
            "short" => Self::Short,
            "integer" => Self::Integer,
            "long" => Self::Long,
            "float" => Self::Float,
            "double" => Self::Double,
            "bigInteger" => Self::BigInteger,
            "bigDecimal" => Self::BigDecimal,
            "timestamp" => Self::Timestamp,
            "document" => Self::Document,
            _ => return None,
        })
    }
}

/// Metadata carried by a `service` shape.
#[derive(Debug, Clone, Default)]
pub struct ServiceMeta {
    /// The service's `version` string.
    pub version: Option<String>,
    /// Operations bound directly to the service.
    pub operations: Vec<ShapeId>,
    /// Resources bound directly to the service.
    pub resources: Vec<ShapeId>,
    /// Errors every operation of the service may return.
    pub errors: Vec<ShapeId>,
    /// `rename` map, keyed by target shape id string, per the Smithy model
    /// (stored pre-resolution since it maps absolute-id-strings to a local
    /// alias, not shape-to-shape).
    pub rename: Vec<(String, String)>,
}

/// Metadata carried by a `resource` shape.
#[derive(Debug, Clone, Default)]
pub struct ResourceMeta {
    /// Identifier member name -> shape id.
    pub identifiers: Vec<(String, ShapeId)>,
    /// Property member name -> shape id.
    pub properties: Vec<(String, ShapeId)>,
    /// `create` lifecycle operation.
    pub create: Option<ShapeId>,
    /// `put` lifecycle operation.
    pub put: Option<ShapeId>,
    /// `read` lifecycle operation.
    pub read: Option<ShapeId>,
    /// `update` lifecycle operation.
    pub update: Option<ShapeId>,
    /// `delete` lifecycle operation.
    pub delete: Option<ShapeId>,
    /// `list` lifecycle operation.
    pub list: Option<ShapeId>,
    /// Non-lifecycle operations scoped to an instance.
    pub operations: Vec<ShapeId>,
    /// Operations scoped to the resource collection.
    pub collection_operations: Vec<ShapeId>,
    /// Child resources.
    pub resources: Vec<ShapeId>,
}

/// Metadata carried by an `operation` shape.
#[derive(Debug, Clone, Default)]
pub struct OperationMeta {
    /// The operation's input structure, if any.
    pub input: Option<ShapeId>,
    /// The operation's output structure, if any.
    pub output: Option<ShapeId>,
    /// The operation's declared error structures.
    pub errors: Vec<ShapeId>,
}

/// The tagged variant over Smithy's type hierarchy.
#[derive(Debug, Clone)]
pub enum ShapeType {
    /// A non-aggregate scalar type.
    Simple(SimpleType),
    /// `list(member)`.
    List(ShapeId),
    /// `map(key, value)`.
    Map(ShapeId, ShapeId),
    /// `structure([member...])`, members in declaration order.
    Structure(Vec<ShapeId>),
    /// `union([member...])`.
    Union(Vec<ShapeId>),
    /// A Smithy 2.0 string `enum`, members in declaration order.
    StrEnum(Vec<ShapeId>),
    /// A Smithy 2.0 `intEnum`, members in declaration order.
    IntEnum(Vec<ShapeId>),
    /// `service`.
    Service(ServiceMeta),
    /// `resource`.
    Resource(ResourceMeta),
    /// `operation`.
    Operation(OperationMeta),
    /// A member shape's reference to its target, i.e. `target(ShapeId)`.
    Target(ShapeId),
}

impl ShapeType {
    /// Member ids directly owned by this shape, in declaration order, for
    /// aggregate shapes. Empty for simple/service/reference shapes.
    #[must_use]
    pub fn own_members(&self) -> &[ShapeId] {
        match self {
            ShapeType::Structure(m) | ShapeType::Union(m) | ShapeType::StrEnum(m) | ShapeType::IntEnum(m) => m,
            _ => &[],
        }
    }

    /// True if this shape is an aggregate (structure/union/enum/list/map).
    #[must_use]
    pub fn is_aggregate(&self) -> bool {
        matches!(
            self,
            ShapeType::List(_)
                | ShapeType::Map(_, _)
                | ShapeType::Structure(_)
                | ShapeType::Union(_)
                | ShapeType::StrEnum(_)
                | ShapeType::IntEnum(_)
        )
    }
}

//! The model tables (spec §3 "Model tables").
//!
//! [`ModelTables`] is the parser's output: every shape's type, every shape's
//! applied traits, every `mixins` edge, and the one `service` shape the
//! model declares (if any). It does no resolution of its own — mixin
//! flattening, trait inheritance through mixins, and member-target lookups
//! are the `sdkgen-symbols` crate's job, built on top of these tables
//! read-only.

use std::collections::HashMap;

use crate::error::{ModelError, ModelResult};
use crate::shape_id::ShapeId;
use crate::shape_type::ShapeType;
use crate::traits::TraitValue;

/// Everything the parser learned about one shape.
#[derive(Debug)]
pub struct ShapeEntry {
    /// The shape's absolute identifier string, kept for diagnostics (the
    /// [`ShapeId`] itself carries no human-readable information).
    pub absolute: String,
    /// The shape's type and own members/metadata.
    pub shape_type: ShapeType,
    /// Traits applied directly to this shape, in declaration order.
    pub traits: Vec<TraitValue>,
    /// Other shapes this shape mixes in, in declaration order (spec's
    /// "linearized left-to-right, depth-first, de-duplicated keep-last").
    pub mixins: Vec<ShapeId>,
}

impl ShapeEntry {
    /// Find a trait application by id.
    #[must_use]
    pub fn trait_value(&self, id: ShapeId) -> Option<&TraitValue> {
        self.traits.iter().find(|t| t.id == id)
    }

    /// True if this shape has the given trait applied directly (not
    /// through a mixin — see [`crate::symbols::SymbolTable::has_trait`]
    /// for the mixin-aware version).
    #[must_use]
    pub fn has_trait(&self, id: ShapeId) -> bool {
        self.traits.iter().any(|t| t.id == id)
    }
}

/// The parsed model: shape table, name table, and service pointer.
///
/// Construction is append-only through [`ModelTables::insert_shape`]; there
/// is deliberately no public API to remove or replace a shape once
/// inserted, matching the single-pass nature of [`crate::parser`].
#[derive(Debug, Default)]
pub struct ModelTables {
    shapes: HashMap<ShapeId, ShapeEntry>,
    /// Reverse map from absolute id string to `ShapeId`, used both for
    /// friendlier diagnostics and to detect hash collisions on insert.
    names: HashMap<ShapeId, String>,
    /// The model's `service` shape, if one is declared (a model may
    /// describe shared shapes only, with no top-level service).
    service_id: Option<ShapeId>,
    /// The Smithy model version string (`"2.0"` et al.).
    pub smithy_version: String,
}

impl ModelTables {
    /// An empty table set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `absolute` under its interned [`ShapeId`], checking for a
    /// hash collision against any previously interned distinct string.
    ///
    /// # Errors
    /// Returns [`ModelError::HashCollision`] if `absolute` hashes to an id
    /// already bound to a *different* absolute string.
    pub fn insert_name(&mut self, id: ShapeId, absolute: &str) -> ModelResult<()> {
        match self.names.get(&id) {
            Some(existing) if existing != absolute => Err(ModelError::HashCollision(
                existing.clone(),
                absolute.to_owned(),
            )),
            Some(_) => Ok(()),
            None => {
                self.names.insert(id, absolute.to_owned());
                Ok(())
            }
        }
    }

    /// Insert a fully-built shape entry, after its name has already been
    /// registered with [`ModelTables::insert_name`].
    pub fn insert_shape(&mut self, id: ShapeId, entry: ShapeEntry) {
        if matches!(entry.shape_type, ShapeType::Service(_)) {
            self.service_id.get_or_insert(id);
        }
        self.shapes.insert(id, entry);
    }

    /// Look up a shape by id.
    #[must_use]
    pub fn get(&self, id: ShapeId) -> Option<&ShapeEntry> {
        self.shapes.get(&id)
    }

    /// The absolute id string a `ShapeId` was interned from, if known.
    #[must_use]
    pub fn absolute_of(&self, id: ShapeId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    /// Iterate every shape in the model, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (ShapeId, &ShapeEntry)> {
        self.shapes.iter().map(|(id, entry)| (*id, entry))
    }

    /// The number of shapes in the model.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// True if the model has no shapes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// The model's single `service` shape id, if declared.
    #[must_use]
    pub fn service_id(&self) -> Option<ShapeId> {
        self.service_id
    }

    /// Append traits onto an already-inserted shape, used to resolve
    /// `apply` statements once the full shape table has been built.
    /// Returns `None` if `id` names no shape.
    pub(crate) fn apply_traits_to(&mut self, id: ShapeId, mut new_traits: Vec<TraitValue>) -> Option<()> {
        let entry = self.shapes.get_mut(&id)?;
        entry.traits.append(&mut new_traits);
        Some(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape_type::SimpleType;

    fn dummy_entry(absolute: &str) -> ShapeEntry {
        ShapeEntry {
            absolute: absolute.to_owned(),
            shape_type: ShapeType::Simple(SimpleType::String),
            traits: Vec::new(),
            mixins: Vec::new(),
        }
    }

    #[test]
    fn inserts_and_looks_up_shapes() {
        let mut tables = ModelTables::new();
        let id = ShapeId::of("a#Foo");
        tables.insert_name(id, "a#Foo").unwrap();
        tables.insert_shape(id, dummy_entry("a#Foo"));
        assert!(tables.get(id).is_some());
        assert_eq!(tables.absolute_of(id), Some("a#Foo"));
    }

    #[test]
    fn reinserting_the_same_name_is_fine() {
        let mut tables = ModelTables::new();
        let id = ShapeId::of("a#Foo");
        tables.insert_name(id, "a#Foo").unwrap();
        tables.insert_name(id, "a#Foo").unwrap();
    }

    #[test]
    fn detects_hash_collision_on_distinct_names() {
        let mut tables = ModelTables::new();
        let id = ShapeId::of("a#Foo");
        tables.insert_name(id, "a#Foo").unwrap();
        // Force a synthetic collision: same id, different source string.
        let err = tables.insert_name(id, "a#Bar").unwrap_err();
        assert!(matches!(err, ModelError::HashCollision(_, _)));
    }
}

//! Symbols provider: the read-only query surface over a parsed model.
//!
//! [`SymbolTable`] sits on top of [`sdkgen_model::ModelTables`] and answers
//! the questions the emitter and protocol binder actually need to ask:
//! what does a shape resolve to, what does it inherit through `mixins`,
//! what's its short name, which operations and errors belong to a
//! service. Mixin flattening is computed lazily on first query and
//! memoized per shape, matching the lazy/memoized requirement the model
//! spec calls out; a shape in the middle of its own flattening is
//! detected and reported as [`error::SymbolsError::MixinCycle`] rather
//! than recursing forever.

pub mod error;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub use error::{SymbolsError, SymbolsResult};
use sdkgen_model::{ModelTables, ShapeId, ShapeType, TraitValue};

/// A read-only query surface over a parsed model, with memoized mixin
/// flattening.
pub struct SymbolTable<'a> {
    model: &'a ModelTables,
    ancestor_cache: RefCell<HashMap<ShapeId, Rc<Vec<ShapeId>>>>,
    member_cache: RefCell<HashMap<ShapeId, Rc<Vec<ShapeId>>>>,
    effective_traits_cache: RefCell<HashMap<ShapeId, Rc<Vec<&'a TraitValue>>>>,
}

impl std::fmt::Debug for SymbolTable<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolTable")
            .field("shapes", &self.model.len())
            .field("ancestor_cache_len", &self.ancestor_cache.borrow().len())
            .field("member_cache_len", &self.member_cache.borrow().len())
            .finish_non_exhaustive()
    }
}

impl<'a> SymbolTable<'a> {
    /// Build a symbol table over an already-parsed model.
    #[must_use]
    pub fn new(model: &'a ModelTables) -> Self {
        Self {
            model,
            ancestor_cache: RefCell::new(HashMap::new()),
            member_cache: RefCell::new(HashMap::new()),
            effective_traits_cache: RefCell::new(HashMap::new()),
        }
    }

    /// The underlying model, for callers that need raw access (e.g. the
    /// protocol binder reading a trait payload directly).
    #[must_use]
    pub fn model(&self) -> &'a ModelTables {
        self.model
    }

    /// A shape's type.
    #[must_use]
    pub fn get_shape(&self, id: ShapeId) -> Option<&'a ShapeType> {
        self.model.get(id).map(|e| &e.shape_type)
    }

    /// A shape's short, unqualified name (the text after the last `$` for
    /// members, or after the last `#` for top-level shapes).
    #[must_use]
    pub fn get_name(&self, id: ShapeId) -> Option<&'a str> {
        let absolute = self.model.absolute_of(id)?;
        Some(local_name(absolute))
    }

    /// The model's service shape, if declared.
    #[must_use]
    pub fn service_id(&self) -> Option<ShapeId> {
        self.model.service_id()
    }

    /// True if `shape` carries `trait_id`, directly or through a mixin.
    #[must_use]
    pub fn has_trait(&self, shape: ShapeId, trait_id: ShapeId) -> bool {
        self.get_trait(shape, trait_id).is_some()
    }

    /// The last-wins trait application of `trait_id` on `shape`, counting
    /// mixins (and, for a member obtained through [`SymbolTable::members`],
    /// counting the same-named member on every mixin ancestor too).
    #[must_use]
    pub fn get_trait(&self, shape: ShapeId, trait_id: ShapeId) -> Option<&'a TraitValue> {
        let traits = self.effective_traits(shape).ok()?;
        traits.iter().rev().find(|t| t.id == trait_id).copied()
    }

    /// The target a member shape resolves to, following `target(...)`
    /// once. `None` if `member` isn't a member (reference) shape.
    #[must_use]
    pub fn resolved_target(&self, member: ShapeId) -> Option<ShapeId> {
        match self.get_shape(member)? {
            ShapeType::Target(target) => Some(*target),
            _ => None,
        }
    }

    /// The flattened, mixin-aware member list of an aggregate shape, in
    /// declaration order. A member declared by both a shape and one of its
    /// mixins keeps the shape's own id and position; the winning member's
    /// effective traits merge the mixin's traits underneath the shape's
    /// own (shape wins on conflicting trait ids).
    ///
    /// # Errors
    /// [`SymbolsError::MixinCycle`] if `shape`'s mixin graph is cyclic, or
    /// [`SymbolsError::UnknownShapeReference`] if a mixin or member target
    /// doesn't exist in the model.
    pub fn members(&self, shape: ShapeId) -> SymbolsResult<Rc<Vec<ShapeId>>> {
        if let Some(cached) = self.member_cache.borrow().get(&shape) {
            return Ok(cached.clone());
        }
        let chain = self.ancestor_chain(shape)?;

        let mut order: Vec<(String, ShapeId)> = Vec::new();
        let mut contributors: HashMap<String, Vec<ShapeId>> = HashMap::new();
        for ancestor in chain.iter() {
            let entry = self
                .model
                .get(*ancestor)
                .ok_or(SymbolsError::UnknownShapeReference(*ancestor))?;
            for member_id in entry.shape_type.own_members() {
                let member_entry = self
                    .model
                    .get(*member_id)
                    .ok_or(SymbolsError::UnknownShapeReference(*member_id))?;
                let name = local_name(&member_entry.absolute).to_owned();
                contributors.entry(name.clone()).or_default().push(*member_id);
                match order.iter_mut().find(|(n, _)| *n == name) {
                    Some(existing) => existing.1 = *member_id,
                    None => order.push((name, *member_id)),
                }
            }
        }

        for (name, winning_id) in &order {
            let mut merged: Vec<&'a TraitValue> = Vec::new();
            for contributor_id in &contributors[name] {
                if let Some(entry) = self.model.get(*contributor_id) {
                    merged.extend(entry.traits.iter());
                }
            }
            self.effective_traits_cache
                .borrow_mut()
                .insert(*winning_id, Rc::new(merged));
        }

        let ids = Rc::new(order.into_iter().map(|(_, id)| id).collect::<Vec<_>>());
        self.member_cache.borrow_mut().insert(shape, ids.clone());
        Ok(ids)
    }

    /// Every operation directly bound to `service` (service-level only;
    /// resource-scoped operations aren't walked since this generator
    /// targets flat AWS-style services, matching the teacher's S3 client).
    #[must_use]
    pub fn operations_of(&self, service: ShapeId) -> Vec<ShapeId> {
        match self.get_shape(service) {
            Some(ShapeType::Service(meta)) => meta.operations.clone(),
            _ => Vec::new(),
        }
    }

    /// Every error shape reachable from `service`: errors declared
    /// directly on the service, plus errors declared on each of its
    /// operations, deduplicated.
    #[must_use]
    pub fn errors_of(&self, service: ShapeId) -> Vec<ShapeId> {
        let Some(ShapeType::Service(meta)) = self.get_shape(service) else {
            return Vec::new();
        };
        let mut out = meta.errors.clone();
        for op_id in &meta.operations {
            if let Some(ShapeType::Operation(op_meta)) = self.get_shape(*op_id) {
                for err in &op_meta.errors {
                    if !out.contains(err) {
                        out.push(*err);
                    }
                }
            }
        }
        out
    }

    fn effective_traits(&self, shape: ShapeId) -> SymbolsResult<Rc<Vec<&'a TraitValue>>> {
        if let Some(cached) = self.effective_traits_cache.borrow().get(&shape) {
            return Ok(cached.clone());
        }
        let chain = self.ancestor_chain(shape)?;
        let mut merged = Vec::new();
        for ancestor in chain.iter() {
            if let Some(entry) = self.model.get(*ancestor) {
                merged.extend(entry.traits.iter());
            }
        }
        let rc = Rc::new(merged);
        self.effective_traits_cache.borrow_mut().insert(shape, rc.clone());
        Ok(rc)
    }

    /// Linearize `shape`'s mixin ancestry depth-first, left-to-right,
    /// furthest ancestor first, `shape` itself last.
    fn ancestor_chain(&self, shape: ShapeId) -> SymbolsResult<Rc<Vec<ShapeId>>> {
        if let Some(cached) = self.ancestor_cache.borrow().get(&shape) {
            return Ok(cached.clone());
        }
        let mut out = Vec::new();
        let mut in_progress = Vec::new();
        self.linearize(shape, &mut in_progress, &mut out)?;
        let rc = Rc::new(out);
        self.ancestor_cache.borrow_mut().insert(shape, rc.clone());
        Ok(rc)
    }

    fn linearize(&self, shape: ShapeId, in_progress: &mut Vec<ShapeId>, out: &mut Vec<ShapeId>) -> SymbolsResult<()> {
        if in_progress.contains(&shape) {
            return Err(SymbolsError::MixinCycle(shape));
        }
        let entry = self
            .model
            .get(shape)
            .ok_or(SymbolsError::UnknownShapeReference(shape))?;
        in_progress.push(shape);
        for mixin in &entry.mixins {
            self.linearize(*mixin, in_progress, out)?;
        }
        in_progress.pop();
        if !out.contains(&shape) {
            out.push(shape);
        }
        Ok(())
    }
}

fn local_name(absolute: &str) -> &str {
    if let Some(idx) = absolute.rfind('$') {
        &absolute[idx + 1..]
    } else if let Some(idx) = absolute.rfind('#') {
        &absolute[idx + 1..]
    } else {
        absolute
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdkgen_model::{IssuesBag, Policy, TraitRegistry, parse_model};

    fn build(src: &str) -> ModelTables {
        let registry = TraitRegistry::with_builtins();
        let issues = IssuesBag::new();
        parse_model(src, &registry, &issues, Policy::Abort).unwrap()
    }

    #[test]
    fn flattens_members_through_a_mixin_child_wins() {
        let model = build(
            r#"{
                "smithy": "2.0",
                "shapes": {
                    "a#Base": {
                        "type": "structure",
                        "members": {
                            "id": { "target": "smithy.api#String" },
                            "shared": { "target": "smithy.api#String" }
                        }
                    },
                    "a#Child": {
                        "type": "structure",
                        "mixins": [{ "target": "a#Base" }],
                        "members": {
                            "shared": {
                                "target": "smithy.api#String",
                                "traits": { "smithy.api#required": {} }
                            },
                            "extra": { "target": "smithy.api#String" }
                        }
                    }
                }
            }"#,
        );
        let symbols = SymbolTable::new(&model);
        let child = ShapeId::of("a#Child");
        let members = symbols.members(child).unwrap();
        let names: Vec<&str> = members.iter().map(|id| symbols.get_name(*id).unwrap()).collect();
        assert_eq!(names, vec!["id", "shared", "extra"]);

        let shared_id = ShapeId::compose("a#Child", "shared");
        assert!(symbols.has_trait(shared_id, ShapeId::of("smithy.api#required")));
    }

    #[test]
    fn resolves_member_target() {
        let model = build(
            r#"{
                "smithy": "2.0",
                "shapes": {
                    "a#Widget": {
                        "type": "structure",
                        "members": { "id": { "target": "smithy.api#String" } }
                    }
                }
            }"#,
        );
        let symbols = SymbolTable::new(&model);
        let member_id = ShapeId::compose("a#Widget", "id");
        assert_eq!(symbols.resolved_target(member_id), Some(ShapeId::of("smithy.api#String")));
    }

    #[test]
    fn detects_mixin_cycles() {
        let model = build(
            r#"{
                "smithy": "2.0",
                "shapes": {
                    "a#X": { "type": "structure", "mixins": [{ "target": "a#Y" }] },
                    "a#Y": { "type": "structure", "mixins": [{ "target": "a#X" }] }
                }
            }"#,
        );
        let symbols = SymbolTable::new(&model);
        let err = symbols.members(ShapeId::of("a#X")).unwrap_err();
        assert!(matches!(err, SymbolsError::MixinCycle(_)));
    }

    #[test]
    fn operations_and_errors_of_service() {
        let model = build(
            r#"{
                "smithy": "2.0",
                "shapes": {
                    "a#Svc": {
                        "type": "service",
                        "version": "2020-01-01",
                        "operations": [{ "target": "a#Op" }],
                        "errors": [{ "target": "a#ServiceWideError" }]
                    },
                    "a#Op": {
                        "type": "operation",
                        "errors": [{ "target": "a#OpError" }]
                    }
                }
            }"#,
        );
        let symbols = SymbolTable::new(&model);
        let svc = ShapeId::of("a#Svc");
        assert_eq!(symbols.operations_of(svc), vec![ShapeId::of("a#Op")]);
        let errors = symbols.errors_of(svc);
        assert!(errors.contains(&ShapeId::of("a#ServiceWideError")));
        assert!(errors.contains(&ShapeId::of("a#OpError")));
    }
}

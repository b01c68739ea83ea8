//! The non-fatal issues bag (spec §4.2, §7 "Deferred issues").
//!
//! Parsing and, later, symbol building and emission, record problems that
//! don't need to stop the pipeline under a `skip` policy: unknown trait
//! ids, unknown shape properties, and similar. Under `abort` policy the
//! same call sites return a hard [`crate::error::ModelError`] instead of
//! recording here.

use std::sync::Mutex;

use crate::shape_id::ShapeId;

/// How the parser should react to an unrecognized input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Policy {
    /// Stop the pipeline for this model with a hard error.
    Abort,
    /// Record the problem in the issues bag and continue.
    #[default]
    Skip,
}

/// One recorded, non-fatal problem.
#[derive(Debug, Clone)]
pub struct Issue {
    /// The shape the issue concerns, if any.
    pub shape: Option<ShapeId>,
    /// Human-readable description.
    pub message: String,
}

/// An append-only bag of [`Issue`]s, safe to share across worker threads.
///
/// Each worker may accumulate into its own bag and merge into a shared one
/// at task boundaries (spec §5), or multiple workers may append directly
/// through the internal mutex; both usages are supported.
#[derive(Debug, Default)]
pub struct IssuesBag {
    issues: Mutex<Vec<Issue>>,
}

impl IssuesBag {
    /// Create an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an issue.
    pub fn record(&self, shape: Option<ShapeId>, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(?shape, %message, "recorded deferred issue");
        self.issues
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(Issue { shape, message });
    }

    /// Merge another bag's issues into this one, draining the other.
    pub fn merge(&self, other: &IssuesBag) {
        let mut drained = other
            .issues
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        self.issues
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .append(&mut drained);
    }

    /// Snapshot all recorded issues.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Issue> {
        self.issues
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// True if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issues
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_and_snapshots() {
        let bag = IssuesBag::new();
        bag.record(None, "unknown trait foo#bar");
        bag.record(Some(ShapeId::of("a#B")), "unknown property baz");
        let snap = bag.snapshot();
        assert_eq!(snap.len(), 2);
    }

    #[test]
    fn merges_another_bag() {
        let a = IssuesBag::new();
        let b = IssuesBag::new();
        b.record(None, "from b");
        a.merge(&b);
        assert_eq!(a.snapshot().len(), 1);
        assert!(b.is_empty());
    }
}

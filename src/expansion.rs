//! Expand/collapse state for the outline tree.
//!
//! The state is a plain set of section ids kept apart from the tree itself, so sections stay
//! immutable and a redraw can be skipped whenever two snapshots compare equal. Every operation
//! returns a new snapshot rather than mutating in place.

use crate::section::SectionId;
use std::collections::HashSet;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Snapshot of which sections are currently expanded.
///
/// Membership is the only signal: an id that is absent is collapsed, whether or not it exists in
/// the current tree.
pub struct ExpansionState {
    expanded: HashSet<SectionId>,
}

impl ExpansionState {
    #[must_use]
    /// Fresh state for a newly normalized tree, with only the root expanded.
    ///
    /// Nothing from any earlier tree carries over: ids are only unique within one tree, so a
    /// leftover id would refer to an unrelated section.
    pub fn seed(root: SectionId) -> Self {
        Self {
            expanded: HashSet::from([root]),
        }
    }

    #[must_use]
    /// Returns a new state with `id` flipped between expanded and collapsed.
    pub fn toggle(&self, id: SectionId) -> Self {
        let mut expanded = self.expanded.clone();
        if !expanded.remove(&id) {
            expanded.insert(id);
        }
        Self { expanded }
    }

    #[must_use]
    /// Returns a new state with `id` expanded.
    pub fn expand(&self, id: SectionId) -> Self {
        if self.is_expanded(id) {
            self.clone()
        } else {
            self.toggle(id)
        }
    }

    #[must_use]
    /// Returns a new state with `id` collapsed.
    pub fn collapse(&self, id: SectionId) -> Self {
        if self.is_expanded(id) {
            self.toggle(id)
        } else {
            self.clone()
        }
    }

    #[must_use]
    /// Whether `id` is currently expanded.
    pub fn is_expanded(&self, id: SectionId) -> bool {
        self.expanded.contains(&id)
    }

    #[must_use]
    /// Number of expanded ids.
    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    #[must_use]
    /// Whether nothing is expanded.
    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/expansion.rs"]
mod tests;

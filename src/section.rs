//! Section representation for normalized document outlines.
//!
//! A section is one node of the outline returned by the extraction service once it has been
//! through the normalizer. Sections own their children directly, so a tree is a single root
//! value that can be cloned, compared and handed to the renderer without any back-references.
//! Identities are synthetic and only meaningful within the tree that produced them.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Opaque identity of a section, unique within one normalized tree.
///
/// Ids are handed out in depth-first pre-order, so the root is always the lowest id and a
/// parent always sorts before its descendants.
pub struct SectionId(pub usize);

impl SectionId {
    /// Identity reserved for the root of every tree.
    pub const ROOT: Self = Self(0);

    #[must_use]
    /// Whether this is the root identity.
    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            write!(f, "root")
        } else {
            write!(f, "sec-{}", self.0)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Hierarchical document division as produced by the normalizer.
pub struct Section {
    /// Synthetic identity assigned during normalization.
    pub id: SectionId,
    /// Heading text shown in the tree.
    pub title: String,
    /// Page the section starts on (1-indexed).
    pub page_number: u32,
    /// Body text, with fragments separated by a blank line.
    pub content: String,
    /// Directly nested subsections in reading order.
    pub children: Vec<Section>,
}

impl Section {
    #[must_use]
    /// Whether this section has any nested subsections.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    #[must_use]
    /// Total number of sections in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Section::count).sum::<usize>()
    }

    #[must_use]
    /// Sections of this subtree in depth-first pre-order.
    pub fn preorder(&self) -> Vec<&Section> {
        let mut out = Vec::with_capacity(self.count());
        let mut stack = vec![self];
        while let Some(section) = stack.pop() {
            out.push(section);
            stack.extend(section.children.iter().rev());
        }
        out
    }

    #[must_use]
    /// Looks up a section by id anywhere in this subtree.
    pub fn find(&self, id: SectionId) -> Option<&Section> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    #[must_use]
    /// Finds the id of the section that directly contains `id`.
    pub fn parent_of(&self, id: SectionId) -> Option<SectionId> {
        for child in &self.children {
            if child.id == id {
                return Some(self.id);
            }
            if let Some(parent) = child.parent_of(id) {
                return Some(parent);
            }
        }
        None
    }

    #[must_use]
    /// Titles from the root down to `id`, for breadcrumb display.
    pub fn path_to(&self, id: SectionId) -> Option<Vec<&str>> {
        if self.id == id {
            return Some(vec![self.title.as_str()]);
        }
        self.children.iter().find_map(|child| {
            child.path_to(id).map(|mut rest| {
                rest.insert(0, self.title.as_str());
                rest
            })
        })
    }
}

#[cfg(test)]
#[path = "tests/section.rs"]
mod tests;

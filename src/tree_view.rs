//! Flattening of the section tree into the rows the tree tab draws.
//!
//! Expansion decides visibility: a collapsed section shows only its heading, an expanded one
//! also shows its content lines and its children. Rows carry their box-drawing prefix so the
//! renderer does no tree walking of its own.

use crate::expansion::ExpansionState;
use crate::section::{Section, SectionId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// What a visible row shows.
pub enum RowKind {
    /// A section title with its page badge.
    Heading,
    /// One line of an expanded section's content.
    Content,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A single visible line of the tree.
pub struct TreeRow<'a> {
    /// Section the row belongs to.
    pub section_id: SectionId,
    /// Whether this is a heading or a content line.
    pub kind: RowKind,
    /// Nesting depth of the owning section (0 for the root).
    pub tree_level: usize,
    /// Box-drawing characters drawn before the text.
    pub prefix: String,
    /// Title for headings, a single line of content otherwise.
    pub text: &'a str,
    /// Page badge of the owning section.
    pub page_number: u32,
    /// Whether the owning section has children, which decides the expand affordance.
    pub has_children: bool,
    /// Whether the owning section is expanded.
    pub expanded: bool,
    /// Whether the cursor may rest on this row.
    pub navigable: bool,
}

#[must_use]
/// Lists the rows visible under `root` for the given expansion state, top to bottom.
pub fn visible_rows<'a>(root: &'a Section, expansion: &ExpansionState) -> Vec<TreeRow<'a>> {
    let mut rows = Vec::new();
    push_rows(root, expansion, 0, true, "", &mut rows);
    rows
}

fn push_rows<'a>(
    section: &'a Section,
    expansion: &ExpansionState,
    level: usize,
    is_last: bool,
    guide: &str,
    rows: &mut Vec<TreeRow<'a>>,
) {
    let expanded = expansion.is_expanded(section.id);
    let has_children = section.has_children();

    let (prefix, child_guide) = if level == 0 {
        (String::new(), String::new())
    } else if is_last {
        (format!("{guide}└── "), format!("{guide}    "))
    } else {
        (format!("{guide}├── "), format!("{guide}│   "))
    };

    rows.push(TreeRow {
        section_id: section.id,
        kind: RowKind::Heading,
        tree_level: level,
        prefix,
        text: &section.title,
        page_number: section.page_number,
        has_children,
        expanded,
        navigable: true,
    });

    if !expanded {
        return;
    }

    if !section.content.is_empty() {
        let content_prefix = if has_children {
            format!("{child_guide}│ ")
        } else {
            format!("{child_guide}  ")
        };
        for line in section.content.lines().filter(|line| !line.trim().is_empty()) {
            rows.push(TreeRow {
                section_id: section.id,
                kind: RowKind::Content,
                tree_level: level,
                prefix: content_prefix.clone(),
                text: line,
                page_number: section.page_number,
                has_children,
                expanded,
                navigable: false,
            });
        }
    }

    let last = section.children.len().saturating_sub(1);
    for (i, child) in section.children.iter().enumerate() {
        push_rows(child, expansion, level + 1, i == last, &child_guide, rows);
    }
}

#[must_use]
/// Ids of the navigable rows, in display order.
pub fn navigable_ids(rows: &[TreeRow<'_>]) -> Vec<SectionId> {
    rows.iter()
        .filter(|row| row.navigable)
        .map(|row| row.section_id)
        .collect()
}

#[must_use]
/// Renders the fully expanded tree as plain text, one heading per line with its page.
pub fn outline_text(root: &Section) -> String {
    let everything = root
        .preorder()
        .into_iter()
        .fold(ExpansionState::default(), |state, section| {
            if section.has_children() {
                state.expand(section.id)
            } else {
                state
            }
        });

    visible_rows(root, &everything)
        .into_iter()
        .filter(|row| row.kind == RowKind::Heading)
        .map(|row| format!("{}{} (p.{})\n", row.prefix, row.text, row.page_number))
        .collect()
}

#[cfg(test)]
#[path = "tests/tree_view.rs"]
mod tests;

//! Normalization of raw extraction payloads into a canonical section tree.
//!
//! The extraction service returns loosely shaped JSON: any field may be missing, `null`, or of
//! an unexpected type, and the schema drifts between service versions. Everything here reads
//! the payload through small lenient decoders that fall back to defaults, so the rest of the
//! crate only ever sees a well-formed [`Section`] tree.
//!
//! Malformed entries (children that are not objects) are dropped without being reported.

use crate::section::{Section, SectionId};
use serde_json::{Map, Value};

/// Title given to sections whose source has no usable title.
pub const UNTITLED: &str = "Untitled";

/// Title given to the root when the payload does not name its source file.
pub const DEFAULT_ROOT_TITLE: &str = "Document";

/// Separator placed between content fragments when the source sends a list.
pub const FRAGMENT_SEPARATOR: &str = "\n\n";

#[derive(Clone, Debug, PartialEq, Eq, Default)]
/// Document-level facts read from the payload metadata.
pub struct DocumentSummary {
    /// Name of the uploaded file as reported by the service.
    pub source_file: Option<String>,
    /// Page count reported by the service.
    pub total_pages: Option<u64>,
    /// Number of text blocks the service classified.
    pub total_blocks: Option<u64>,
    /// Sections in the normalized tree, root included.
    pub section_count: usize,
}

/// Converts a raw hierarchy payload into a section tree rooted at [`SectionId::ROOT`].
///
/// Ids are assigned in depth-first pre-order from a counter local to this call, so normalizing
/// the same payload twice yields identical trees.
#[must_use]
pub fn normalize(raw: &Value) -> Section {
    let mut next_id = SectionId::ROOT.0 + 1;

    let children = raw
        .get("sections")
        .map(|sections| decode_children(sections, &mut next_id))
        .unwrap_or_default();

    let title = raw
        .get("metadata")
        .and_then(|metadata| metadata.get("source_file"))
        .and_then(non_empty_str)
        .unwrap_or(DEFAULT_ROOT_TITLE)
        .to_string();

    tracing::debug!(sections = next_id - 1, "normalized hierarchy");

    Section {
        id: SectionId::ROOT,
        title,
        page_number: 1,
        content: String::new(),
        children,
    }
}

/// Reads the document summary out of a raw payload and its normalized tree.
#[must_use]
pub fn summarize(raw: &Value, root: &Section) -> DocumentSummary {
    let metadata = raw.get("metadata");
    let field = |key: &str| metadata.and_then(|m| m.get(key));

    DocumentSummary {
        source_file: field("source_file")
            .and_then(non_empty_str)
            .map(ToString::to_string),
        total_pages: field("total_pages").and_then(Value::as_u64),
        total_blocks: field("total_blocks").and_then(Value::as_u64),
        section_count: root.count(),
    }
}

fn decode_children(value: &Value, next_id: &mut usize) -> Vec<Section> {
    let Some(entries) = value.as_array() else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(Value::as_object)
        .map(|entry| decode_section(entry, next_id))
        .collect()
}

fn decode_section(raw: &Map<String, Value>, next_id: &mut usize) -> Section {
    // Claim the id before descending so parents sort ahead of their children.
    let id = SectionId(*next_id);
    *next_id += 1;

    Section {
        id,
        title: raw
            .get("title")
            .and_then(non_empty_str)
            .unwrap_or(UNTITLED)
            .to_string(),
        page_number: raw.get("pageNumber").map_or(1, decode_page_number),
        content: raw.get("content").map(decode_content).unwrap_or_default(),
        children: raw
            .get("children")
            .map(|children| decode_children(children, next_id))
            .unwrap_or_default(),
    }
}

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.is_empty())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn decode_page_number(value: &Value) -> u32 {
    let page = match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 1.0 && *f <= f64::from(u32::MAX))
                .map(|f| f as u64)
        }),
        _ => None,
    };

    page.and_then(|p| u32::try_from(p).ok())
        .filter(|p| *p >= 1)
        .unwrap_or(1)
}

fn decode_content(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(fragments) => fragments
            .iter()
            .filter_map(fragment_text)
            .collect::<Vec<_>>()
            .join(FRAGMENT_SEPARATOR),
        _ => String::new(),
    }
}

fn fragment_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/hierarchy.rs"]
mod tests;

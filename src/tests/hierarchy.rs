use super::{normalize, summarize, DEFAULT_ROOT_TITLE, UNTITLED};
use crate::section::SectionId;
use serde_json::json;
use std::collections::HashSet;

fn sample() -> serde_json::Value {
    json!({
        "metadata": { "source_file": "report.pdf", "total_pages": 12, "total_blocks": 80 },
        "sections": [
            {
                "title": "Introduction",
                "pageNumber": 1,
                "content": ["First paragraph.", "Second paragraph."],
                "children": [
                    { "title": "Background", "pageNumber": 2, "content": "Some history." },
                    { "title": "Scope", "pageNumber": 3, "children": null }
                ]
            },
            {
                "title": "Methods",
                "pageNumber": 4,
                "children": [
                    {
                        "title": "Data",
                        "pageNumber": 5,
                        "children": [{ "title": "Sources", "pageNumber": 6 }]
                    }
                ]
            }
        ]
    })
}

#[test]
fn test_node_count_is_sections_plus_root() {
    let root = normalize(&sample());

    // Six sections in the payload, plus the synthetic root.
    assert_eq!(root.count(), 7);

    let ids: HashSet<SectionId> = root.preorder().iter().map(|s| s.id).collect();
    assert_eq!(ids.len(), 7, "ids should be pairwise distinct");
}

#[test]
fn test_ids_follow_preorder() {
    let root = normalize(&sample());

    let visited: Vec<(usize, &str)> = root
        .preorder()
        .iter()
        .map(|s| (s.id.0, s.title.as_str()))
        .collect();

    assert_eq!(
        visited,
        vec![
            (0, "report.pdf"),
            (1, "Introduction"),
            (2, "Background"),
            (3, "Scope"),
            (4, "Methods"),
            (5, "Data"),
            (6, "Sources"),
        ]
    );
}

#[test]
fn test_normalization_is_reproducible() {
    let raw = sample();
    assert_eq!(normalize(&raw), normalize(&raw));
}

#[test]
fn test_content_fragments_are_joined_with_blank_line() {
    let root = normalize(&json!({
        "sections": [
            { "title": "A", "content": ["a", "b"] },
            { "title": "B" },
            { "title": "C", "content": "plain" },
            { "title": "D", "content": null }
        ]
    }));

    let content: Vec<&str> = root.children.iter().map(|s| s.content.as_str()).collect();
    assert_eq!(content, vec!["a\n\nb", "", "plain", ""]);
}

#[test]
fn test_missing_fields_fall_back_to_defaults() {
    let root = normalize(&json!({ "sections": [{}] }));
    let section = &root.children[0];

    assert_eq!(section.title, UNTITLED);
    assert_eq!(section.page_number, 1);
    assert_eq!(section.content, "");
    assert!(section.children.is_empty());
}

#[test]
fn test_wrongly_typed_fields_fall_back_to_defaults() {
    let root = normalize(&json!({
        "sections": [
            { "title": 42, "pageNumber": "7", "content": { "text": "x" }, "children": "none" },
            { "title": "", "pageNumber": 0 },
            { "title": "Negative", "pageNumber": -3 },
            { "title": "Float", "pageNumber": 9.0 }
        ]
    }));

    let first = &root.children[0];
    assert_eq!(first.title, UNTITLED);
    assert_eq!(first.page_number, 1);
    assert_eq!(first.content, "");
    assert!(first.children.is_empty());

    assert_eq!(root.children[1].title, UNTITLED);
    assert_eq!(root.children[1].page_number, 1);
    assert_eq!(root.children[2].page_number, 1);
    assert_eq!(root.children[3].page_number, 9);
}

#[test]
fn test_non_object_children_are_skipped() {
    let root = normalize(&json!({
        "sections": [
            "stray string",
            { "title": "Kept", "children": [null, 3, { "title": "Nested" }, []] },
            null,
            { "title": "Also kept" }
        ]
    }));

    let titles: Vec<&str> = root.preorder().iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec![DEFAULT_ROOT_TITLE, "Kept", "Nested", "Also kept"]);

    // Dropped entries do not consume ids.
    let ids: Vec<usize> = root.preorder().iter().map(|s| s.id.0).collect();
    assert_eq!(ids, vec![0, 1, 2, 3]);
}

#[test]
fn test_root_exists_for_empty_document() {
    let root = normalize(&json!({ "metadata": { "source_file": "empty.pdf" }, "sections": [] }));

    assert_eq!(root.id, SectionId::ROOT);
    assert_eq!(root.title, "empty.pdf");
    assert_eq!(root.content, "");
    assert_eq!(root.page_number, 1);
    assert!(root.children.is_empty());
}

#[test]
fn test_root_title_defaults_without_metadata() {
    assert_eq!(normalize(&json!({})).title, DEFAULT_ROOT_TITLE);
    assert_eq!(normalize(&json!({ "metadata": null })).title, DEFAULT_ROOT_TITLE);
    assert_eq!(normalize(&json!("not an object")).title, DEFAULT_ROOT_TITLE);
}

#[test]
fn test_source_order_is_preserved() {
    let root = normalize(&json!({
        "sections": [{ "title": "Zeta" }, { "title": "Alpha" }, { "title": "Mu" }]
    }));
    let titles: Vec<&str> = root.children.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Zeta", "Alpha", "Mu"]);
}

#[test]
fn test_summary_reads_metadata() {
    let raw = sample();
    let root = normalize(&raw);
    let summary = summarize(&raw, &root);

    assert_eq!(summary.source_file.as_deref(), Some("report.pdf"));
    assert_eq!(summary.total_pages, Some(12));
    assert_eq!(summary.total_blocks, Some(80));
    assert_eq!(summary.section_count, 7);

    let bare = json!({ "sections": [] });
    let summary = summarize(&bare, &normalize(&bare));
    assert_eq!(summary.source_file, None);
    assert_eq!(summary.total_pages, None);
    assert_eq!(summary.section_count, 1);
}

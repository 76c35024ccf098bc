//! doctree: browse the outline of a PDF as extracted by a remote service.
//!
//! A PDF is uploaded to the extraction service, the loosely shaped hierarchy it returns is
//! normalized into a [`section::Section`] tree, and the tree is shown in a terminal UI with
//! expandable nodes next to the raw JSON.

pub mod app_state;
pub mod client;
pub mod config;
pub mod error;
pub mod expansion;
pub mod hierarchy;
pub mod logging;
pub mod section;
pub mod tree_view;
pub mod ui;
pub mod upload;

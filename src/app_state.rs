//! The core state machine bridging extraction results and the interactive tree.
//!
//! A TUI needs a single source of truth that can be interrogated and mutated as the user
//! navigates. `AppState` owns the selected file, the in-flight flag and synthetic progress, the
//! normalized tree with its pretty-printed JSON, and all view state (tab, palette, cursor,
//! expansion). It is only ever mutated from the event loop; the network request itself runs
//! elsewhere and hands its result back through [`AppState::finish_extraction`].

use crate::client::Extractor;
use crate::error::{Error, ExtractionError, Result, ValidationError};
use crate::expansion::ExpansionState;
use crate::hierarchy::{self, DocumentSummary};
use crate::section::{Section, SectionId};
use crate::tree_view::{navigable_ids, visible_rows};
use crate::upload::{self, SelectedFile};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Progress shown once the upload has been handed to the client.
pub const PROGRESS_UPLOADING: u8 = 10;
/// Progress shown once the service has answered.
pub const PROGRESS_RECEIVED: u8 = 70;
/// Progress shown once the tree is stored.
pub const PROGRESS_DONE: u8 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Which rendering of the hierarchy is on screen.
pub enum Tab {
    /// Expandable outline.
    Tree,
    /// Pretty-printed raw payload.
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Determines how keystrokes are interpreted.
pub enum View {
    /// Keys navigate the active tab.
    Browse,
    /// Captures vim-style command input after ':' keystroke.
    Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// What the event loop should do after a command has been run.
pub enum Action {
    /// Keep going.
    None,
    /// Start an extraction for the selected file.
    Process,
    /// Leave the application.
    Quit,
}

/// Orchestrates upload, extraction and normalization, and holds the view state around them.
pub struct AppState {
    /// File picked for extraction, if any.
    pub selected_file: Option<SelectedFile>,
    /// Whether an extraction is in flight.
    pub is_processing: bool,
    /// Synthetic progress milestone, 0 to 100.
    pub progress: u8,
    /// Message for the last failure, cleared on the next attempt.
    pub error: Option<String>,
    /// Normalized outline of the last successful extraction.
    pub hierarchy: Option<Section>,
    /// Pretty-printed untouched payload of the last successful extraction.
    pub json_output: Option<String>,
    /// Metadata of the last successful extraction.
    pub summary: Option<DocumentSummary>,
    /// Rendering currently on screen.
    pub active_tab: Tab,
    /// Whether the dark palette is in use.
    pub dark_mode: bool,
    /// Which sections are expanded in the tree tab.
    pub expansion: ExpansionState,
    /// Section under the cursor in the tree tab.
    pub current_section: SectionId,
    /// First visible line of the JSON tab.
    pub json_scroll: u16,
    /// Active input mode.
    pub current_view: View,
    /// Accumulates vim-style command input after ':' is pressed.
    pub command_buffer: String,
    /// Status feedback displayed in the help bar.
    pub message: Option<String>,
    /// Default destination for `:w`.
    pub export_path: PathBuf,
}

impl AppState {
    #[must_use]
    /// Empty state with no file and no hierarchy.
    pub fn new(dark_mode: bool, export_path: PathBuf) -> Self {
        Self {
            selected_file: None,
            is_processing: false,
            progress: 0,
            error: None,
            hierarchy: None,
            json_output: None,
            summary: None,
            active_tab: Tab::Tree,
            dark_mode,
            expansion: ExpansionState::seed(SectionId::ROOT),
            current_section: SectionId::ROOT,
            json_scroll: 0,
            current_view: View::Browse,
            command_buffer: String::new(),
            message: None,
            export_path,
        }
    }

    // --- Upload & extraction ---

    /// Picks `file` for the next extraction if it passes validation.
    ///
    /// A rejected file leaves the previous selection in place and shows the reason.
    ///
    /// # Errors
    ///
    /// Returns the validation failure.
    pub fn select_file(&mut self, file: SelectedFile) -> Result<()> {
        if let Err(e) = upload::validate(&file) {
            tracing::info!(file = %file.file_name, error = %e, "file rejected");
            self.error = Some(e.to_string());
            return Err(e.into());
        }
        tracing::info!(file = %file.file_name, size = file.size, "file selected");
        self.selected_file = Some(file);
        self.error = None;
        Ok(())
    }

    /// Describes the file at `path` and selects it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails validation.
    pub fn select_path(&mut self, path: &Path) -> Result<()> {
        match SelectedFile::from_path(path) {
            Ok(file) => self.select_file(file),
            Err(e) => {
                self.error = Some(format!("Cannot open {}: {e}", path.display()));
                Err(e.into())
            }
        }
    }

    /// Marks an extraction as started and returns the file to send.
    ///
    /// Only one extraction may be in flight; a request made while busy is rejected and leaves
    /// the state untouched. The selected file is described afresh from disk and validated
    /// again, then earlier results and errors are cleared.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Busy`] while an extraction is running, an I/O error if the selected file
    /// can no longer be read, or a validation error if it is missing or no longer acceptable.
    pub fn begin_extraction(&mut self) -> Result<SelectedFile> {
        if self.is_processing {
            return Err(Error::Busy);
        }

        let Some(ref selected) = self.selected_file else {
            self.error = Some(ValidationError::NoFile.to_string());
            return Err(ValidationError::NoFile.into());
        };

        // The file may have changed on disk since it was selected.
        let file = match SelectedFile::from_path(&selected.path) {
            Ok(file) => file,
            Err(e) => {
                self.error = Some(format!("Cannot open {}: {e}", selected.path.display()));
                return Err(e.into());
            }
        };
        if let Err(e) = upload::validate(&file) {
            tracing::info!(file = %file.file_name, error = %e, "file rejected");
            self.error = Some(e.to_string());
            return Err(e.into());
        }
        self.selected_file = Some(file.clone());

        self.is_processing = true;
        self.progress = PROGRESS_UPLOADING;
        self.error = None;
        self.message = None;
        self.clear_results();

        tracing::info!(file = %file.file_name, "extraction started");
        Ok(file)
    }

    /// Starts an extraction on behalf of a keystroke or command.
    ///
    /// Like [`AppState::begin_extraction`], but a rejection is turned into feedback instead of
    /// an error: validation failures are already in the error bar, and a request made while busy
    /// is reported in the help bar.
    pub fn request_extraction(&mut self) -> Option<SelectedFile> {
        match self.begin_extraction() {
            Ok(file) => Some(file),
            Err(e @ Error::Busy) => {
                self.message = Some(e.to_string());
                None
            }
            Err(_) => None,
        }
    }

    /// Applies the outcome of the extraction started by [`AppState::begin_extraction`].
    ///
    /// On success the tree, the JSON text and a freshly seeded expansion state replace whatever
    /// was there. On failure nothing partial is kept and progress drops back to zero.
    ///
    /// # Errors
    ///
    /// Returns the extraction failure after recording it in the state.
    pub fn finish_extraction(
        &mut self,
        outcome: std::result::Result<Value, ExtractionError>,
    ) -> Result<()> {
        self.is_processing = false;

        match outcome {
            Ok(raw) => {
                self.progress = PROGRESS_RECEIVED;
                let root = hierarchy::normalize(&raw);
                let json = match serde_json::to_string_pretty(&raw) {
                    Ok(json) => json,
                    Err(e) => {
                        return self.fail(ExtractionError::InvalidResponse(e.to_string()));
                    }
                };

                tracing::info!(
                    sections = root.count() - 1,
                    title = %root.title,
                    "extraction finished"
                );

                self.summary = Some(hierarchy::summarize(&raw, &root));
                self.expansion = ExpansionState::seed(root.id);
                self.current_section = root.id;
                self.hierarchy = Some(root);
                self.json_output = Some(json);
                self.json_scroll = 0;
                self.progress = PROGRESS_DONE;
                Ok(())
            }
            Err(e) => self.fail(e),
        }
    }

    /// Runs a whole extraction against `extractor`.
    ///
    /// # Errors
    ///
    /// Returns whatever [`AppState::begin_extraction`] or the extractor failed with.
    pub async fn process<E>(&mut self, extractor: &E) -> Result<()>
    where
        E: Extractor + ?Sized,
    {
        let file = self.begin_extraction()?;
        let outcome = extractor.extract(&file).await;
        self.finish_extraction(outcome)
    }

    fn fail(&mut self, e: ExtractionError) -> Result<()> {
        tracing::warn!(error = %e, "extraction failed");
        self.clear_results();
        self.error = Some(e.to_string());
        self.progress = 0;
        Err(e.into())
    }

    fn clear_results(&mut self) {
        self.hierarchy = None;
        self.json_output = None;
        self.summary = None;
        self.json_scroll = 0;
    }

    /// Writes the JSON output to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NothingToExport`] before the first successful extraction, or an I/O
    /// error if the file cannot be written.
    pub fn export_json(&mut self, path: &Path) -> Result<()> {
        let Some(ref json) = self.json_output else {
            return Err(Error::NothingToExport);
        };
        fs::write(path, json)?;
        tracing::info!(path = %path.display(), "exported hierarchy");
        self.message = Some(format!("Saved to {}", path.display()));
        Ok(())
    }

    // --- View state ---

    /// Flips between the tree and JSON tabs.
    pub fn switch_tab(&mut self) {
        self.active_tab = match self.active_tab {
            Tab::Tree => Tab::Json,
            Tab::Json => Tab::Tree,
        };
    }

    /// Flips between the light and dark palettes.
    pub fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
    }

    /// Scrolls the JSON tab by `delta` lines, staying within the text.
    pub fn scroll_json(&mut self, delta: i32) {
        let lines = self
            .json_output
            .as_ref()
            .map_or(0, |json| json.lines().count());
        let max = u16::try_from(lines.saturating_sub(1)).unwrap_or(u16::MAX);
        let next = i64::from(self.json_scroll) + i64::from(delta);
        self.json_scroll = u16::try_from(next.clamp(0, i64::from(max))).unwrap_or(max);
    }

    // --- Tree navigation ---

    #[must_use]
    /// The section under the cursor.
    pub fn current(&self) -> Option<&Section> {
        self.hierarchy
            .as_ref()
            .and_then(|root| root.find(self.current_section))
    }

    fn visible_ids(&self) -> Vec<SectionId> {
        self.hierarchy.as_ref().map_or_else(Vec::new, |root| {
            navigable_ids(&visible_rows(root, &self.expansion))
        })
    }

    fn step(&mut self, forward: bool) {
        let ids = self.visible_ids();
        let Some(pos) = ids.iter().position(|id| *id == self.current_section) else {
            if let Some(first) = ids.first() {
                self.current_section = *first;
            }
            return;
        };
        let next = if forward {
            ids.get(pos + 1)
        } else {
            pos.checked_sub(1).and_then(|p| ids.get(p))
        };
        if let Some(id) = next {
            self.current_section = *id;
        }
    }

    /// Moves the cursor to the next visible section.
    pub fn select_next(&mut self) {
        self.step(true);
    }

    /// Moves the cursor to the previous visible section.
    pub fn select_prev(&mut self) {
        self.step(false);
    }

    /// Moves the cursor to the top of the tree.
    pub fn select_first(&mut self) {
        if let Some(first) = self.visible_ids().first() {
            self.current_section = *first;
        }
    }

    /// Moves the cursor to the last visible section.
    pub fn select_last(&mut self) {
        if let Some(last) = self.visible_ids().last() {
            self.current_section = *last;
        }
    }

    /// Moves the cursor to the containing section.
    pub fn select_parent(&mut self) {
        if let Some(parent) = self
            .hierarchy
            .as_ref()
            .and_then(|root| root.parent_of(self.current_section))
        {
            self.current_section = parent;
        }
    }

    /// Expands or collapses the section under the cursor.
    pub fn toggle_selected(&mut self) {
        if self.hierarchy.is_some() {
            self.expansion = self.expansion.toggle(self.current_section);
        }
    }

    /// Expands the section under the cursor, or steps into it if already expanded.
    pub fn expand_selected(&mut self) {
        let Some(current) = self.current() else {
            return;
        };
        let first_child = current.children.first().map(|child| child.id);
        let id = current.id;

        if !self.expansion.is_expanded(id) {
            self.expansion = self.expansion.expand(id);
        } else if let Some(child) = first_child {
            self.current_section = child;
        }
    }

    /// Collapses the section under the cursor, or steps out to its parent if already collapsed.
    pub fn collapse_selected(&mut self) {
        if self.hierarchy.is_none() {
            return;
        }
        if self.expansion.is_expanded(self.current_section) {
            self.expansion = self.expansion.collapse(self.current_section);
        } else {
            self.select_parent();
        }
    }

    // --- Commands ---

    /// Runs a vim-style command typed after ':'.
    ///
    /// `e <path>` selects a file, `p` starts an extraction, `w [path]` exports the JSON, and `q`
    /// quits.
    pub fn run_command(&mut self, cmd: &str) -> Action {
        let cmd = cmd.trim();
        let (name, arg) = cmd
            .split_once(char::is_whitespace)
            .map_or((cmd, ""), |(name, arg)| (name, arg.trim()));

        match (name, arg) {
            ("q" | "q!", _) => Action::Quit,
            ("p", _) => Action::Process,
            ("e", "") => {
                self.message = Some("Usage: :e <path>".to_string());
                Action::None
            }
            ("e", path) => {
                if self.select_path(Path::new(path)).is_ok() {
                    self.message = Some(format!("Selected {path}"));
                }
                Action::None
            }
            ("w", path) => {
                let target = if path.is_empty() {
                    self.export_path.clone()
                } else {
                    PathBuf::from(path)
                };
                if let Err(e) = self.export_json(&target) {
                    self.message = Some(format!("Error saving: {e}"));
                }
                Action::None
            }
            _ => {
                self.message = Some(format!("Unknown command: {cmd}"));
                Action::None
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/app_state.rs"]
mod tests;

//! Configuration to acknowledge developer preferences as well as set defaults.
//!
//! Specifically, we try to find a doctree.toml, and if present we load settings from there.
//! This provides the extraction service endpoint, the export path, and display preferences.

use crate::error::{Error, Result};
use facet::Facet;
use std::path::Path;
use std::{fs, io};

/// File name looked up in the working directory.
pub const CONFIG_FILE: &str = "doctree.toml";

#[derive(Facet, Clone, Debug, PartialEq)]
/// User preferences loaded from doctree.toml or falling back to defaults.
pub struct Config {
    #[facet(default = "http://localhost:8000".to_string())]
    /// Base URL of the extraction service.
    pub endpoint: String,
    #[facet(default = "document-hierarchy.json".to_string())]
    /// Where `:w` writes the JSON output when no path is given.
    pub export_path: String,
    #[facet(default = false)]
    /// Start with the dark palette.
    pub dark_mode: bool,
    #[facet(default = ".".to_string())]
    /// Directory the log file is written to.
    pub log_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8000".to_string(),
            export_path: "document-hierarchy.json".to_string(),
            dark_mode: false,
            log_dir: ".".to_string(),
        }
    }
}

impl Config {
    /// Parse the configuration at `path`, or `None` if there is no such file.
    ///
    /// Callers fall back to [`Config::default`] on error once logging is up to report it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file does not parse, or an I/O error if it exists but
    /// cannot be read.
    pub fn read(path: &Path) -> Result<Option<Self>> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        facet_toml::from_str::<Self>(&contents)
            .map(Some)
            .map_err(|e| Error::Config {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;

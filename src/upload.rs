//! The local validation boundary for uploads.
//!
//! A file is described by name, MIME type and size only; its bytes are read later, by the
//! client, once validation has passed. Anything rejected here never reaches the network.

use crate::error::ValidationError;
use std::path::{Path, PathBuf};
use std::{fs, io};

/// The only MIME type the extraction service accepts.
pub const PDF_MIME: &str = "application/pdf";

/// Largest accepted upload: 500 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 500 * 1024 * 1024;

#[derive(Clone, Debug, PartialEq, Eq)]
/// A file the user has picked for extraction.
pub struct SelectedFile {
    /// Location on disk.
    pub path: PathBuf,
    /// Name sent as the multipart filename.
    pub file_name: String,
    /// MIME type guessed from the extension.
    pub mime_type: String,
    /// Size in bytes when the file was last described.
    pub size: u64,
}

impl SelectedFile {
    /// Describes the file at `path` from its metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be stat'ed or is not a regular file.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let metadata = fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a file", path.display()),
            ));
        }

        let mime_type = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or("application/octet-stream")
            .to_string();

        let file_name = path
            .file_name()
            .map_or_else(|| "upload.pdf".to_string(), |n| n.to_string_lossy().into_owned());

        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            mime_type,
            size: metadata.len(),
        })
    }

    #[must_use]
    /// Size in MiB for display.
    #[allow(clippy::cast_precision_loss)]
    pub fn size_mib(&self) -> f64 {
        self.size as f64 / (1024.0 * 1024.0)
    }
}

/// Checks the file against the accepted type and size.
///
/// # Errors
///
/// Returns [`ValidationError::NotPdf`] or [`ValidationError::TooLarge`].
pub fn validate(file: &SelectedFile) -> Result<(), ValidationError> {
    if file.mime_type != PDF_MIME {
        return Err(ValidationError::NotPdf {
            mime_type: file.mime_type.clone(),
        });
    }
    if file.size > MAX_UPLOAD_BYTES {
        return Err(ValidationError::TooLarge { size: file.size });
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/upload.rs"]
mod tests;

//! Per-request temporary storage for uploaded model files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};

use crate::config::UploadSettings;

const DIR_PREFIX: &str = "osm-upload-";
const FILE_STEM: &str = "uploaded_model";
const MAX_EXTENSION_LEN: usize = 16;

/// An uploaded file saved inside its own uniquely named temporary directory.
///
/// The directory and everything in it is removed when the value is dropped,
/// so every exit path (including unwinding) cleans up. [`ScopedUpload::close`]
/// does the same but logs the outcome.
#[derive(Debug)]
pub struct ScopedUpload {
    dir: TempDir,
    path: PathBuf,
}

impl ScopedUpload {
    /// Write `bytes` to `<tempdir>/uploaded_model.<ext>`.
    ///
    /// `<ext>` is taken from `filename` when it is short and alphanumeric,
    /// otherwise `settings.default_extension` is used.
    pub fn create(settings: &UploadSettings, filename: &str, bytes: &[u8]) -> io::Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(DIR_PREFIX);
        let dir = match &settings.temp_dir {
            Some(root) => {
                fs::create_dir_all(root)?;
                builder.tempdir_in(root)?
            }
            None => builder.tempdir()?,
        };

        let extension = extension_for(filename).unwrap_or(settings.default_extension.as_str());
        let path = dir.path().join(format!("{}.{}", FILE_STEM, extension));
        fs::write(&path, bytes)?;
        debug!(path = %path.display(), bytes = bytes.len(), "saved upload");

        Ok(Self { dir, path })
    }

    /// Path of the saved file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Temporary directory holding the file.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Remove the temporary directory, logging failures instead of returning them.
    pub fn close(self) {
        let dir = self.dir.path().to_path_buf();
        match self.dir.close() {
            Ok(()) => debug!(dir = %dir.display(), "removed upload directory"),
            Err(e) => warn!(dir = %dir.display(), error = %e, "failed to remove upload directory"),
        }
    }
}

fn extension_for(filename: &str) -> Option<&str> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
}

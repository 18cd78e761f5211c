//! Locating the export file when no explicit path is given.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::TakeoutError;

/// File name Google Takeout uses for the YouTube comment history.
pub const EXPORT_FILE_NAME: &str = "comments.csv";

/// Walks `root` recursively and returns the first `comments.csv` found.
///
/// Directory entries are visited in file-name order so the result does not
/// depend on filesystem enumeration order. The name match is
/// case-insensitive. Unreadable entries are logged and skipped.
///
/// # Errors
///
/// Returns [`TakeoutError::NotFound`] when no matching file exists.
pub fn discover_export(root: &Path) -> Result<PathBuf, TakeoutError> {
    tracing::info!(root = %root.display(), "searching for {EXPORT_FILE_NAME}");

    for entry in WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable entry during discovery");
                continue;
            }
        };
        if entry.file_type().is_file()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.eq_ignore_ascii_case(EXPORT_FILE_NAME))
        {
            let found = entry.into_path();
            tracing::info!(path = %found.display(), "found export");
            return Ok(found);
        }
    }

    Err(TakeoutError::NotFound {
        root: root.to_path_buf(),
        file_name: EXPORT_FILE_NAME.to_owned(),
    })
}

//! Workbook discovery

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::ReportResult;

/// Every file under `root` whose extension is in `extensions`, sorted
///
/// Extensions are given without the leading dot and compared
/// case-insensitively.
pub fn list_workbook_files<P: AsRef<Path>>(
    root: P,
    extensions: &[String],
) -> ReportResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root.as_ref()) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let allowed = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_ascii_lowercase();
                extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(&ext))
            })
            .unwrap_or(false);
        if allowed {
            files.push(entry.into_path());
        }
    }
    files.sort();
    debug!(root = %root.as_ref().display(), count = files.len(), "listed workbook files");
    Ok(files)
}

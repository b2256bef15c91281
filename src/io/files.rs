use crate::types::{Error, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Find files under `root_dir` whose name ends with `extension` (e.g. ".tif").
///
/// Only the top level is scanned unless `recursive` is set. Results are sorted by path.
pub fn find_files<P: AsRef<Path>>(root_dir: P, extension: &str, recursive: bool) -> Result<Vec<PathBuf>> {
    let root = root_dir.as_ref();
    if !root.is_dir() {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Directory does not exist: {}", root.display()),
        )));
    }

    let mut walker = WalkDir::new(root).min_depth(1).sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut found = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| Error::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy().ends_with(extension) {
            found.push(entry.into_path());
        }
    }

    log::debug!("Found {} '{}' files under {}", found.len(), extension, root.display());
    Ok(found)
}

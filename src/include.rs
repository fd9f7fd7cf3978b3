//! Include expansion
//!
//! Pulls files from configured extra directories into the invocation's
//! file set before the virtual file table is built, so included files
//! participate in import resolution exactly like primary files.

use crate::error::{BuildError, Result};
use crate::paths;
use crate::types::SourceFile;
use std::fs;
use walkdir::WalkDir;

/// Recursively discover files under each include directory and append
/// them to `files` in traversal order. Directories are processed strictly
/// sequentially; within a directory the walk is sorted by file name so the
/// resulting order is deterministic. Discovered files are anchored to the
/// first file of the primary input set for package-relative semantics.
///
/// Any traversal or read failure aborts the whole invocation.
pub fn expand_included_folders(
    files: &mut Vec<SourceFile>,
    include_dirs: &[String],
    extensions: &[String],
) -> Result<()> {
    if include_dirs.is_empty() {
        return Ok(());
    }

    let anchor_package = files
        .first()
        .and_then(|file| file.package().map(str::to_string));

    for dir in include_dirs {
        log::debug!("expanding include directory {}", dir);
        let mut discovered = Vec::new();

        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| BuildError::discovery(dir, e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path().to_string_lossy().replace('\\', "/");
            match paths::extension_of(&path) {
                Some(extension) if extensions.iter().any(|allowed| allowed == extension) => {
                    discovered.push(path)
                }
                // Files without an extension are always excluded.
                _ => {}
            }
        }

        for path in discovered {
            let contents =
                fs::read_to_string(&path).map_err(|e| BuildError::discovery(&path, e.to_string()))?;
            files.push(SourceFile::included(path, contents, anchor_package.clone()));
        }
    }

    Ok(())
}

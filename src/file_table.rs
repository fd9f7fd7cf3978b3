//! Virtual file table for cross-file import resolution
//!
//! Maps every file's canonical import path to its index in the
//! invocation's file vector. Built once after include expansion and
//! immutable afterwards; both compilation stages resolve imports through
//! it instead of touching the filesystem.

use crate::paths;
use crate::types::SourceFile;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct FileTable {
    entries: HashMap<String, usize>,
}

impl FileTable {
    /// Build the table over the expanded file set. Exactly one entry per
    /// distinct import path; a later file with a colliding import path
    /// overwrites the earlier one (last-write-wins).
    pub fn build(files: &[SourceFile]) -> Self {
        let mut entries = HashMap::new();
        for (index, file) in files.iter().enumerate() {
            if let Some(previous) = entries.insert(file.import_path().to_string(), index) {
                log::debug!(
                    "import path {} redefined by {} (was entry {})",
                    file.import_path(),
                    file.display_path(),
                    previous
                );
            }
        }
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, import_path: &str) -> bool {
        self.entries.contains_key(import_path)
    }

    pub fn index_of(&self, import_path: &str) -> Option<usize> {
        self.entries.get(import_path).copied()
    }

    /// Resolve an import path to its file handle within `files` (the same
    /// slice the table was built over).
    pub fn get<'a>(&self, files: &'a [SourceFile], import_path: &str) -> Option<&'a SourceFile> {
        self.index_of(import_path).and_then(|index| files.get(index))
    }

    /// Whether any table entry lives under the given path, treating it as
    /// a directory prefix. The SCSS import resolver probes directories
    /// while searching for `index` files.
    pub fn contains_dir(&self, path: &str) -> bool {
        let prefix = format!("{}/", paths::normalize(path));
        self.entries.keys().any(|key| key.starts_with(&prefix))
    }
}

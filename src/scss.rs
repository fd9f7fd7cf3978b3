//! SCSS compilation
//!
//! Wraps the `grass` compiler behind the pipeline's virtual file table:
//! `@import`/`@use` references resolve against sibling files, partials and
//! included-folder files instead of the real filesystem, and each file's
//! current effective contents (global variables already injected) are what
//! the compiler reads.

use crate::error::{BuildError, Result};
use crate::file_table::FileTable;
use crate::paths;
use crate::types::SourceFile;
use grass::{Fs, Options, OutputStyle};
use std::io;
use std::path::Path;

/// Output of compiling one SCSS root file. `grass` does not emit source
/// maps, so the map is always absent here; the stylesheet artifact carries
/// the CSS modules stage's map instead.
#[derive(Debug, Clone)]
pub struct CompiledCss {
    pub source: String,
    pub source_map: Option<String>,
}

/// Filesystem adapter serving the virtual file table to the compiler. The
/// import resolver joins paths textually, so every probe is normalized
/// before lookup.
#[derive(Debug)]
struct TableFs<'a> {
    files: &'a [SourceFile],
    table: &'a FileTable,
}

impl Fs for TableFs<'_> {
    fn is_dir(&self, path: &Path) -> bool {
        self.table.contains_dir(&path.to_string_lossy())
    }

    fn is_file(&self, path: &Path) -> bool {
        self.table.contains(&paths::normalize(&path.to_string_lossy()))
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        let key = paths::normalize(&path.to_string_lossy());
        match self.table.get(self.files, &key) {
            Some(file) => Ok(file.effective_contents().as_bytes().to_vec()),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} is not part of the build's file set", key),
            )),
        }
    }
}

#[derive(Debug, Default)]
pub struct ScssCompiler;

impl ScssCompiler {
    pub fn new() -> Self {
        Self
    }

    /// Compile one root file. The input syntax (SCSS or indented SASS) is
    /// picked from the file's extension.
    pub fn compile(
        &self,
        file: &SourceFile,
        files: &[SourceFile],
        table: &FileTable,
    ) -> Result<CompiledCss> {
        let fs = TableFs { files, table };
        let options = Options::default().style(OutputStyle::Expanded).fs(&fs);

        let source = grass::from_path(file.import_path(), &options)
            .map_err(|err| BuildError::scss_compile(file.display_path(), err.to_string()))?;

        Ok(CompiledCss {
            source,
            source_map: None,
        })
    }
}

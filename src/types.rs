//! Core data types shared across the pipeline

use crate::error::Diagnostic;
use crate::paths;
use crate::PipelineStats;
use serde::{Deserialize, Serialize};

/// Per-file options supplied by the host, overriding filename conventions.
///
/// An explicit `is_import` beats the leading-underscore partial convention
/// during root-file selection in the SCSS stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileOptions {
    pub is_import: Option<bool>,
}

/// One stylesheet-bearing unit owned by a single pipeline invocation.
///
/// `effective_contents` starts as the raw source and is overwritten in
/// place by the SCSS stage, so every later reader (the virtual file table
/// during import resolution, the CSS modules stage) sees compiled CSS
/// instead of raw SCSS.
#[derive(Debug, Clone)]
pub struct SourceFile {
    package_relative_path: String,
    package: Option<String>,
    import_path: String,
    effective_contents: String,
    file_options: Option<FileOptions>,
    included: bool,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, contents: impl Into<String>) -> Self {
        Self::build(path.into(), None, contents.into(), false)
    }

    /// A file belonging to a named package; the package prefixes the
    /// import path used for cross-file resolution.
    pub fn in_package(
        path: impl Into<String>,
        package: impl Into<String>,
        contents: impl Into<String>,
    ) -> Self {
        Self::build(path.into(), Some(package.into()), contents.into(), false)
    }

    /// A file discovered by include expansion, anchored to the package of
    /// the first file in the primary input set.
    pub fn included(
        path: impl Into<String>,
        contents: impl Into<String>,
        anchor_package: Option<String>,
    ) -> Self {
        Self::build(path.into(), anchor_package, contents.into(), true)
    }

    fn build(path: String, package: Option<String>, contents: String, included: bool) -> Self {
        let package_relative_path = paths::normalize(&path);
        let import_path = match &package {
            Some(package) => format!("{}/{}", package, package_relative_path),
            None => package_relative_path.clone(),
        };
        Self {
            package_relative_path,
            package,
            import_path,
            effective_contents: contents,
            file_options: None,
            included,
        }
    }

    pub fn with_options(mut self, options: FileOptions) -> Self {
        self.file_options = Some(options);
        self
    }

    /// Package-relative path, forward-slash normalized.
    pub fn path_in_package(&self) -> &str {
        &self.package_relative_path
    }

    pub fn package(&self) -> Option<&str> {
        self.package.as_deref()
    }

    /// Canonical path used as the file-table key for import resolution.
    pub fn import_path(&self) -> &str {
        &self.import_path
    }

    /// Path shown in diagnostics.
    pub fn display_path(&self) -> &str {
        &self.package_relative_path
    }

    pub fn effective_contents(&self) -> &str {
        &self.effective_contents
    }

    /// Replace what this file's contents are for the rest of the pipeline.
    pub fn set_effective_contents(&mut self, contents: String) {
        self.effective_contents = contents;
    }

    pub fn file_options(&self) -> Option<&FileOptions> {
        self.file_options.as_ref()
    }

    pub fn extension(&self) -> Option<&str> {
        paths::extension_of(&self.package_relative_path)
    }

    pub fn is_partial(&self) -> bool {
        paths::is_partial(&self.package_relative_path)
    }

    /// Root-file determination: an explicit `is_import` option is negated;
    /// otherwise fall back to the partial-filename convention.
    pub fn is_root(&self) -> bool {
        match self.file_options.as_ref().and_then(|options| options.is_import) {
            Some(is_import) => !is_import,
            None => !self.is_partial(),
        }
    }

    pub fn is_included(&self) -> bool {
        self.included
    }
}

/// An output handed back to the host for downstream bundling. One-way: the
/// pipeline never reads artifacts back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmittedArtifact {
    Stylesheet {
        path: String,
        data: String,
        source_map: Option<String>,
    },
    Script {
        path: String,
        data: String,
        source_path: String,
    },
}

impl EmittedArtifact {
    pub fn path(&self) -> &str {
        match self {
            Self::Stylesheet { path, .. } => path,
            Self::Script { path, .. } => path,
        }
    }

    pub fn data(&self) -> &str {
        match self {
            Self::Stylesheet { data, .. } => data,
            Self::Script { data, .. } => data,
        }
    }

    pub fn is_stylesheet(&self) -> bool {
        matches!(self, Self::Stylesheet { .. })
    }

    pub fn is_script(&self) -> bool {
        matches!(self, Self::Script { .. })
    }
}

/// Everything one `process_files_for_target` invocation hands back to the
/// host: registered artifacts, per-file diagnostics, and counters.
#[derive(Debug, Default)]
pub struct BuildOutput {
    pub artifacts: Vec<EmittedArtifact>,
    pub diagnostics: Vec<Diagnostic>,
    pub stats: PipelineStats,
}

impl BuildOutput {
    pub fn stylesheets(&self) -> impl Iterator<Item = &EmittedArtifact> {
        self.artifacts.iter().filter(|a| a.is_stylesheet())
    }

    pub fn scripts(&self) -> impl Iterator<Item = &EmittedArtifact> {
        self.artifacts.iter().filter(|a| a.is_script())
    }
}

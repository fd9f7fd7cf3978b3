//! Error types for the build pipeline

use std::fmt;
use thiserror::Error;

/// A per-file compile diagnostic, reported through the build output instead
/// of aborting the batch.
///
/// SCSS compile failures are recoverable: the offending file keeps its
/// original contents and the rest of the invocation continues. The host
/// build system attaches the diagnostic to the source file it names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    /// Display path of the file the diagnostic belongs to.
    pub source_path: String,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>, source_path: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source_path: source_path.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source_path, self.message)
    }
}

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Include discovery error in {path}: {message}")]
    Discovery { path: String, message: String },

    #[error("SCSS compiler error in {file}: {message}")]
    ScssCompile { file: String, message: String },

    #[error("CSS modules transform error in {file}: {message}")]
    CssTransform { file: String, message: String },

    #[error("Script generation error: {message}")]
    Script { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },
}

pub type Result<T> = std::result::Result<T, BuildError>;

impl BuildError {
    pub fn discovery(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Discovery {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn scss_compile(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ScssCompile {
            file: file.into(),
            message: message.into(),
        }
    }

    pub fn css_transform(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CssTransform {
            file: file.into(),
            message: message.into(),
        }
    }

    pub fn script(message: impl Into<String>) -> Self {
        Self::Script {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

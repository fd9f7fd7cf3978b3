//! Plugin configuration
//!
//! The pipeline consumes a read-only [`PluginConfig`], loadable from a
//! `.toml` or `.json` file. Transform plugins are typed descriptors with a
//! stable `name` identity; the well-known simple-vars plugin is the only
//! one the pipeline itself inspects.

use crate::error::{BuildError, Result};
use crate::types::FileOptions;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;

/// Identity of the transform plugin whose `variables` mapping is extracted
/// into the global SCSS variable block.
pub const SIMPLE_VARS_PLUGIN: &str = "postcss-simple-vars";

/// A configured transform plugin. Only its identity and the optional
/// `variables` mapping matter to the pipeline; everything else about the
/// plugin runs inside the external transform engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransformPluginConfig {
    pub name: String,
    /// Insertion-ordered so the rendered variable block is deterministic.
    #[serde(default)]
    pub variables: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    /// Extensions handled by the pipeline, without leading dots.
    pub extensions: Vec<String>,

    /// Extra directories whose files are pulled into every invocation.
    pub explicit_includes: Vec<String>,

    /// Output-path template for stylesheet artifacts (`.css` appended).
    pub output_css_file_path: String,

    /// Output-path template for script artifacts (`.js` appended).
    pub output_js_file_path: String,

    /// When false, no global variable block is ever prepended.
    pub extract_simple_vars: bool,

    /// Scoped class-name pattern handed to the CSS modules transform.
    pub class_name_pattern: String,

    /// Ordered transform-plugin list searched for the simple-vars identity.
    pub plugins: Vec<TransformPluginConfig>,

    /// Per-file options keyed by package-relative path.
    pub file_options: HashMap<String, FileOptions>,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["css".to_string(), "scss".to_string(), "sass".to_string()],
            explicit_includes: Vec::new(),
            output_css_file_path: "{dirname}/{basename}".to_string(),
            output_js_file_path: "{dirname}/{basename}".to_string(),
            extract_simple_vars: true,
            class_name_pattern: "[hash]_[local]".to_string(),
            plugins: Vec::new(),
            file_options: HashMap::new(),
        }
    }
}

impl PluginConfig {
    /// First configured plugin matching the given identity.
    pub fn find_plugin(&self, name: &str) -> Option<&TransformPluginConfig> {
        self.plugins.iter().find(|plugin| plugin.name == name)
    }

    pub fn handles_extension(&self, extension: &str) -> bool {
        self.extensions.iter().any(|allowed| allowed == extension)
    }
}

pub fn load(config_path: &str) -> Result<PluginConfig> {
    let config_content = fs::read_to_string(config_path).map_err(|e| BuildError::FileNotFound {
        path: format!("Config file {}: {}", config_path, e),
    })?;

    let config = if config_path.ends_with(".json") {
        serde_json::from_str(&config_content).map_err(|e| BuildError::InvalidFormat {
            message: format!("Invalid JSON config: {}", e),
        })?
    } else if config_path.ends_with(".toml") {
        toml::from_str(&config_content).map_err(|e| BuildError::InvalidFormat {
            message: format!("Invalid TOML config: {}", e),
        })?
    } else {
        return Err(BuildError::InvalidFormat {
            message: "Config file must be .json or .toml format".to_string(),
        });
    };

    log::info!("Loaded configuration from {}", config_path);
    Ok(config)
}

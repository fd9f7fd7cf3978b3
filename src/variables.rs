//! Global variable extraction
//!
//! Inspects the configured transform-plugin list for the well-known
//! simple-vars plugin and renders its variable mapping as a block of SCSS
//! variable assignments, prepended to every SCSS root file by the
//! pipeline. Rendering is purely textual; values are not validated
//! against SCSS syntax.

use crate::config::{PluginConfig, SIMPLE_VARS_PLUGIN};
use serde_json::Value;

/// Compute the variable block once per invocation. `None` when simple-var
/// extraction is disabled or no simple-vars plugin is configured.
pub fn global_variable_block(config: &PluginConfig) -> Option<String> {
    if !config.extract_simple_vars {
        return None;
    }

    let plugin = config.find_plugin(SIMPLE_VARS_PLUGIN)?;
    let variables = plugin.variables.as_ref()?;

    let mut block = String::new();
    for (name, value) in variables {
        block.push_str(&format!("${}: {};\n", name, render_value(value)));
    }
    Some(block)
}

/// SCSS-side rendering of a configured value. Strings are unquoted so
/// `"red"` becomes the color keyword, not a quoted SCSS string; everything
/// else keeps its JSON text form.
fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

//! Script artifact generation
//!
//! Renders the token mapping of a transformed file as an ES module
//! exporting the map as the default export and as a named `styles`
//! export. Tokens whose logical name is a valid identifier additionally
//! get their own named constant, so call sites can import individual
//! class names directly.

use crate::css_modules::TokenMap;
use crate::error::{BuildError, Result};
use regex::Regex;

/// Names that cannot be re-exported as constants.
const RESERVED_WORDS: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete", "do",
    "else", "enum", "export", "extends", "false", "finally", "for", "function", "if", "import",
    "in", "instanceof", "let", "new", "null", "return", "static", "super", "switch", "this",
    "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

pub struct ScriptEmitter {
    identifier_regex: Regex,
}

impl ScriptEmitter {
    pub fn new() -> Self {
        Self {
            identifier_regex: Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap(),
        }
    }

    /// Render the module source for one file's token mapping.
    pub fn emit_token_module(&self, tokens: &TokenMap) -> Result<String> {
        let json = serde_json::to_string(tokens).map_err(|err| BuildError::script(err.to_string()))?;

        let mut module = format!(
            "const styles = {};\nexport {{ styles as default, styles }};\n",
            json
        );

        for (name, scoped) in tokens {
            if self.exportable(name) {
                let value =
                    serde_json::to_string(scoped).map_err(|err| BuildError::script(err.to_string()))?;
                module.push_str(&format!("export const {} = {};\n", name, value));
            }
        }

        Ok(module)
    }

    fn exportable(&self, name: &str) -> bool {
        name != "styles" && !RESERVED_WORDS.contains(&name) && self.identifier_regex.is_match(name)
    }
}

impl Default for ScriptEmitter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(pairs: &[(&str, &str)]) -> TokenMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_exports_default_and_named_styles() {
        let emitter = ScriptEmitter::new();
        let module = emitter
            .emit_token_module(&tokens(&[("btn", "x_btn")]))
            .unwrap();

        assert!(module.starts_with("const styles = {\"btn\":\"x_btn\"};"));
        assert!(module.contains("export { styles as default, styles };"));
    }

    #[test]
    fn test_identifier_tokens_get_named_constants() {
        let emitter = ScriptEmitter::new();
        let module = emitter
            .emit_token_module(&tokens(&[("btn", "x_btn"), ("btn-primary", "x_btn-primary")]))
            .unwrap();

        assert!(module.contains("export const btn = \"x_btn\";"));
        // Kebab-case names are reachable only through the map.
        assert!(!module.contains("export const btn-primary"));
        assert!(module.contains("\"btn-primary\":\"x_btn-primary\""));
    }

    #[test]
    fn test_reserved_and_colliding_names_are_skipped() {
        let emitter = ScriptEmitter::new();
        let module = emitter
            .emit_token_module(&tokens(&[("default", "x_default"), ("styles", "x_styles")]))
            .unwrap();

        assert!(!module.contains("export const default"));
        assert!(!module.contains("export const styles ="));
        assert!(module.contains("\"default\":\"x_default\""));
    }

    #[test]
    fn test_module_is_deterministic_for_same_tokens() {
        let emitter = ScriptEmitter::new();
        let map = tokens(&[("b", "x_b"), ("a", "x_a")]);
        assert_eq!(
            emitter.emit_token_module(&map).unwrap(),
            emitter.emit_token_module(&map).unwrap()
        );
        // BTreeMap ordering puts `a` first regardless of insertion order.
        assert!(emitter
            .emit_token_module(&map)
            .unwrap()
            .starts_with("const styles = {\"a\":\"x_a\",\"b\":\"x_b\"};"));
    }
}

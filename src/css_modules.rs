//! CSS modules transform
//!
//! Parses each non-partial file's effective contents with `lightningcss`,
//! scopes class names according to the configured pattern, and resolves
//! `composes` references. Same-file and global references resolve in
//! place; cross-file references resolve through the virtual file table by
//! scoping the referenced file's exports, with memoization and a cycle
//! guard. Transform failures are batch-fatal, unlike SCSS failures.

use crate::error::{BuildError, Result};
use crate::file_table::FileTable;
use crate::paths;
use crate::types::SourceFile;
use lightningcss::css_modules::{Config, CssModuleExports, CssModuleReference, Pattern};
use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use parcel_sourcemap::SourceMap;
use std::collections::{BTreeMap, HashMap};

/// Logical class name to generated scoped class name. Ordered so emitted
/// scripts are deterministic.
pub type TokenMap = BTreeMap<String, String>;

/// Output of transforming one file.
#[derive(Debug, Clone, Default)]
pub struct TransformOutput {
    pub source: String,
    pub source_map: Option<String>,
    pub tokens: Option<TokenMap>,
}

pub struct CssModulesProcessor {
    pattern: String,
    /// Token maps of dependency files already scoped during this
    /// invocation, keyed by import path.
    resolved: HashMap<String, TokenMap>,
}

impl CssModulesProcessor {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            resolved: HashMap::new(),
        }
    }

    pub fn process(
        &mut self,
        file: &SourceFile,
        files: &[SourceFile],
        table: &FileTable,
    ) -> Result<TransformOutput> {
        let (source, source_map, exports) = self.print_scoped(file)?;

        let tokens = match exports {
            Some(exports) if !exports.is_empty() => {
                let mut visiting = vec![file.import_path().to_string()];
                Some(self.resolve_tokens(file, exports, files, table, &mut visiting)?)
            }
            _ => None,
        };

        Ok(TransformOutput {
            source,
            source_map,
            tokens,
        })
    }

    /// Parse and reprint one file with class scoping applied, returning
    /// the generated CSS, its source map and the raw exports.
    fn print_scoped(
        &self,
        file: &SourceFile,
    ) -> Result<(String, Option<String>, Option<CssModuleExports>)> {
        let pattern = Pattern::parse(&self.pattern).map_err(|err| {
            BuildError::config(format!(
                "invalid class name pattern {:?}: {:?}",
                self.pattern, err
            ))
        })?;

        let options = ParserOptions {
            filename: file.import_path().to_string(),
            css_modules: Some(Config {
                pattern,
                ..Config::default()
            }),
            ..ParserOptions::default()
        };

        let stylesheet = StyleSheet::parse(file.effective_contents(), options)
            .map_err(|err| BuildError::css_transform(file.display_path(), err.to_string()))?;

        let mut map = SourceMap::new("/");
        let result = stylesheet
            .to_css(PrinterOptions {
                source_map: Some(&mut map),
                ..PrinterOptions::default()
            })
            .map_err(|err| BuildError::css_transform(file.display_path(), err.to_string()))?;

        let source_map = map.to_json(None).ok();
        Ok((result.code, source_map, result.exports))
    }

    fn resolve_tokens(
        &mut self,
        file: &SourceFile,
        exports: CssModuleExports,
        files: &[SourceFile],
        table: &FileTable,
        visiting: &mut Vec<String>,
    ) -> Result<TokenMap> {
        let mut tokens = TokenMap::new();

        for (name, export) in exports {
            let mut parts = vec![export.name];
            for reference in export.composes {
                match reference {
                    CssModuleReference::Local { name } => parts.push(name),
                    CssModuleReference::Global { name } => parts.push(name),
                    CssModuleReference::Dependency { name, specifier } => {
                        parts.push(self.resolve_dependency(
                            file, &specifier, &name, files, table, visiting,
                        )?);
                    }
                }
            }
            tokens.insert(name, parts.join(" "));
        }

        Ok(tokens)
    }

    /// Scoped name of `class` as exported by the file `specifier` points
    /// at, resolved relative to the composing file.
    fn resolve_dependency(
        &mut self,
        file: &SourceFile,
        specifier: &str,
        class: &str,
        files: &[SourceFile],
        table: &FileTable,
        visiting: &mut Vec<String>,
    ) -> Result<String> {
        let target = paths::resolve_relative(file.import_path(), specifier);

        if visiting.iter().any(|path| path == &target) {
            return Err(BuildError::css_transform(
                file.display_path(),
                format!("circular composes reference through {}", target),
            ));
        }

        if !self.resolved.contains_key(&target) {
            let dependency = table.get(files, &target).ok_or_else(|| {
                BuildError::css_transform(
                    file.display_path(),
                    format!("composes target {} is not part of the build's file set", specifier),
                )
            })?;

            visiting.push(target.clone());
            let (_, _, exports) = self.print_scoped(dependency)?;
            let tokens = match exports {
                Some(exports) => {
                    self.resolve_tokens(dependency, exports, files, table, visiting)?
                }
                None => TokenMap::new(),
            };
            visiting.pop();
            self.resolved.insert(target.clone(), tokens);
        }

        self.resolved[&target].get(class).cloned().ok_or_else(|| {
            BuildError::css_transform(
                file.display_path(),
                format!("class {} is not exported by {}", class, specifier),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn process(files: &[SourceFile], index: usize) -> Result<TransformOutput> {
        let table = FileTable::build(files);
        CssModulesProcessor::new("[hash]_[local]").process(&files[index], files, &table)
    }

    #[test]
    fn test_scopes_class_names_and_exports_tokens() {
        let files = vec![SourceFile::new("app/a.css", ".btn { color: red; }")];
        let output = process(&files, 0).unwrap();

        let tokens = output.tokens.unwrap();
        let scoped = tokens.get("btn").unwrap();
        assert_ne!(scoped, "btn");
        assert!(scoped.ends_with("_btn"));
        assert!(output.source.contains(scoped));
        assert!(output.source_map.unwrap().starts_with('{'));
    }

    #[test]
    fn test_scoped_names_depend_on_the_file_path() {
        let files = vec![
            SourceFile::new("a.css", ".btn { color: red; }"),
            SourceFile::new("b.css", ".btn { color: red; }"),
        ];
        let a = process(&files, 0).unwrap().tokens.unwrap();
        let b = process(&files, 1).unwrap().tokens.unwrap();
        assert_ne!(a.get("btn"), b.get("btn"));
    }

    #[test]
    fn test_no_class_tokens_yields_none() {
        let files = vec![SourceFile::new("plain.css", "body { margin: 0; }")];
        let output = process(&files, 0).unwrap();
        assert!(output.tokens.is_none());
        assert!(output.source.contains("margin: 0"));
    }

    #[test]
    fn test_empty_file_yields_no_output_fields() {
        let files = vec![SourceFile::new("empty.css", "")];
        let output = process(&files, 0).unwrap();
        assert!(output.source.is_empty());
        assert!(output.tokens.is_none());
    }

    #[test]
    fn test_composes_local_class() {
        let files = vec![SourceFile::new(
            "a.css",
            ".base { color: red; } .btn { composes: base; background: blue; }",
        )];
        let tokens = process(&files, 0).unwrap().tokens.unwrap();

        let base = tokens.get("base").unwrap().clone();
        let btn = tokens.get("btn").unwrap();
        let parts: Vec<&str> = btn.split(' ').collect();
        assert_eq!(parts.len(), 2);
        assert!(parts[0].ends_with("_btn"));
        assert_eq!(parts[1], base);
    }

    #[test]
    fn test_composes_global_class() {
        let files = vec![SourceFile::new(
            "a.css",
            ".btn { composes: legacy from global; color: red; }",
        )];
        let tokens = process(&files, 0).unwrap().tokens.unwrap();
        let btn = tokens.get("btn").unwrap();
        assert!(btn.ends_with(" legacy"));
    }

    #[test]
    fn test_composes_resolves_through_file_table() {
        let files = vec![
            SourceFile::new(
                "app/a.css",
                ".btn { composes: base from \"./base.css\"; color: red; }",
            ),
            SourceFile::new("app/base.css", ".base { padding: 4px; }"),
        ];

        let btn_tokens = process(&files, 0).unwrap().tokens.unwrap();
        let base_tokens = process(&files, 1).unwrap().tokens.unwrap();

        let btn = btn_tokens.get("btn").unwrap();
        let base = base_tokens.get("base").unwrap();
        assert!(btn.ends_with(&format!(" {}", base)));
    }

    #[test]
    fn test_missing_composes_target_is_fatal() {
        let files = vec![SourceFile::new(
            "a.css",
            ".btn { composes: base from \"./nope.css\"; }",
        )];
        assert!(matches!(
            process(&files, 0),
            Err(BuildError::CssTransform { .. })
        ));
    }

    #[test]
    fn test_missing_composes_class_is_fatal() {
        let files = vec![
            SourceFile::new("a.css", ".btn { composes: nope from \"./base.css\"; }"),
            SourceFile::new("base.css", ".base { color: red; }"),
        ];
        assert!(matches!(
            process(&files, 0),
            Err(BuildError::CssTransform { .. })
        ));
    }

    #[test]
    fn test_circular_composes_is_detected() {
        let files = vec![
            SourceFile::new("a.css", ".a { composes: b from \"./b.css\"; }"),
            SourceFile::new("b.css", ".b { composes: a from \"./a.css\"; }"),
        ];
        match process(&files, 0) {
            Err(BuildError::CssTransform { message, .. }) => {
                assert!(message.contains("circular"), "unexpected message: {}", message)
            }
            other => panic!("expected CssTransform error, got {:?}", other.map(|o| o.source)),
        }
    }

    #[test]
    fn test_invalid_css_is_fatal() {
        let files = vec![SourceFile::new("bad.css", ".a { color: $unprocessed; }")];
        assert!(matches!(
            process(&files, 0),
            Err(BuildError::CssTransform { .. })
        ));
    }
}

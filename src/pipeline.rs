//! Pipeline orchestration
//!
//! One invocation runs five strictly sequential phases over a single file
//! set: include expansion, file-table construction, global-variable
//! computation, SCSS compilation, CSS modules transformation. The SCSS
//! stage rewrites effective contents in place, so every CSS-modules-stage
//! read observes compiled CSS. SCSS failures are recovered per file; CSS
//! modules failures abort the batch.

use crate::config::PluginConfig;
use crate::css_modules::CssModulesProcessor;
use crate::error::{Diagnostic, Result};
use crate::file_table::FileTable;
use crate::include;
use crate::paths;
use crate::scss::ScssCompiler;
use crate::script::ScriptEmitter;
use crate::types::{BuildOutput, EmittedArtifact, SourceFile};
use crate::variables;
use crate::PipelineStats;
use std::collections::HashSet;
use std::time::Instant;

/// Process one batch of source files and hand back the artifacts,
/// diagnostics and counters of the invocation.
pub fn process_files_for_target(
    mut files: Vec<SourceFile>,
    config: &PluginConfig,
) -> Result<BuildOutput> {
    let start_time = Instant::now();
    let mut stats = PipelineStats::default();
    stats.input_file_count = files.len();

    log::debug!(
        "Phase 1: expanding {} include directories",
        config.explicit_includes.len()
    );
    include::expand_included_folders(&mut files, &config.explicit_includes, &config.extensions)?;
    stats.included_file_count = files.len() - stats.input_file_count;

    log::debug!("Phase 2: building virtual file table over {} files", files.len());
    let table = FileTable::build(&files);

    log::debug!("Phase 3: computing global variable block");
    let global_variables = variables::global_variable_block(config);

    log::debug!("Phase 4: compiling SCSS root files");
    let mut diagnostics = Vec::new();
    let errored = compile_scss_files(
        &mut files,
        &table,
        global_variables.as_deref(),
        &mut diagnostics,
        &mut stats,
    );

    log::debug!("Phase 5: CSS modules transform");
    let artifacts = compile_css_modules(&files, &table, config, &errored, &mut stats)?;

    stats.build_time_ms = start_time.elapsed().as_millis() as u64;
    log::debug!(
        "Pipeline complete: {} artifacts, {} diagnostics in {}ms",
        artifacts.len(),
        diagnostics.len(),
        stats.build_time_ms
    );

    Ok(BuildOutput {
        artifacts,
        diagnostics,
        stats,
    })
}

fn is_scss(file: &SourceFile) -> bool {
    matches!(file.extension(), Some("scss") | Some("sass"))
}

/// Compile every SCSS root file in place. Returns the indices of files
/// whose compilation failed; those are reported as diagnostics, keep their
/// pre-injection contents and are skipped by the rest of the pipeline.
fn compile_scss_files(
    files: &mut [SourceFile],
    table: &FileTable,
    global_variables: Option<&str>,
    diagnostics: &mut Vec<Diagnostic>,
    stats: &mut PipelineStats,
) -> HashSet<usize> {
    let compiler = ScssCompiler::new();
    let mut errored = HashSet::new();

    let roots: Vec<usize> = files
        .iter()
        .enumerate()
        .filter(|(_, file)| is_scss(file) && file.is_root())
        .map(|(index, _)| index)
        .collect();
    stats.scss_root_count = roots.len();

    for index in roots {
        let original = files[index].effective_contents().to_string();
        let injected = format!("{}\n\n{}", global_variables.unwrap_or(""), original);
        files[index].set_effective_contents(injected);

        let result = {
            let files_view: &[SourceFile] = files;
            compiler.compile(&files_view[index], files_view, table)
        };

        match result {
            Ok(compiled) => {
                files[index].set_effective_contents(compiled.source);
                stats.scss_compiled_count += 1;
            }
            Err(err) => {
                log::debug!("SCSS compilation failed for {}", files[index].display_path());
                diagnostics.push(Diagnostic::new(
                    format!("CSS modules SCSS compiler error: {}", err),
                    files[index].display_path(),
                ));
                files[index].set_effective_contents(original);
                errored.insert(index);
                stats.scss_error_count += 1;
            }
        }
    }

    errored
}

/// Transform every non-partial file in file-set order and collect the
/// emitted artifacts. Selection deliberately ignores the `is_import` file
/// option; only the underscore convention applies here.
fn compile_css_modules(
    files: &[SourceFile],
    table: &FileTable,
    config: &PluginConfig,
    errored: &HashSet<usize>,
    stats: &mut PipelineStats,
) -> Result<Vec<EmittedArtifact>> {
    let mut processor = CssModulesProcessor::new(config.class_name_pattern.as_str());
    let emitter = ScriptEmitter::new();
    let mut artifacts = Vec::new();

    for (index, file) in files.iter().enumerate() {
        if file.is_partial() || errored.contains(&index) {
            continue;
        }

        let output = processor.process(file, files, table)?;

        if !output.source.is_empty() {
            artifacts.push(EmittedArtifact::Stylesheet {
                path: format!(
                    "{}.css",
                    paths::output_path(file.path_in_package(), &config.output_css_file_path)
                ),
                data: output.source,
                source_map: output.source_map,
            });
            stats.stylesheet_count += 1;
        }

        if let Some(tokens) = output.tokens {
            stats.token_count += tokens.len();
            let path = format!(
                "{}.js",
                paths::output_path(file.path_in_package(), &config.output_js_file_path)
            );
            artifacts.push(EmittedArtifact::Script {
                data: emitter.emit_token_module(&tokens)?,
                source_path: path.clone(),
                path,
            });
            stats.script_count += 1;
        }
    }

    Ok(artifacts)
}

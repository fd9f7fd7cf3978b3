use crate::cli::OutputFormat;
use crate::error::{BuildError, Result};
use crate::types::{BuildOutput, EmittedArtifact};
use crate::{build_project, PluginConfig};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use std::sync::mpsc::channel;
use std::time::Instant;

// --- BUILD ---
pub fn handle_build_command(cli: &super::Cli, matches: &clap::ArgMatches) -> Result<()> {
    let project_dir = matches.get_one::<String>("project").unwrap();
    let output_dir = matches.get_one::<String>("output").unwrap();
    let config = cli.build_config(matches);

    if matches.get_flag("watch") {
        watch_and_build(project_dir, output_dir, config)
    } else {
        build_once(project_dir, output_dir, &config, matches)
    }
}

fn build_once(
    project_dir: &str,
    output_dir: &str,
    config: &PluginConfig,
    matches: &clap::ArgMatches,
) -> Result<()> {
    println!("🔨 Building {} -> {}", project_dir, output_dir);

    let build_start = Instant::now();
    let output = build_project(project_dir, config)?;
    write_artifacts(&output, output_dir)?;
    let build_time = build_start.elapsed();

    for diagnostic in &output.diagnostics {
        eprintln!("❌ {}", diagnostic);
    }

    println!(
        "✅ Build finished: {} stylesheets, {} scripts in {:.2?}",
        output.stats.stylesheet_count, output.stats.script_count, build_time
    );
    if output.stats.scss_error_count > 0 {
        println!(
            "   ⚠️  {} file(s) failed SCSS compilation",
            output.stats.scss_error_count
        );
    }

    if matches.get_flag("stats") {
        let format = matches.get_one::<OutputFormat>("format").unwrap();
        print_detailed_stats(&output, format)?;
    }

    Ok(())
}

fn watch_and_build(project_dir: &str, output_dir: &str, config: PluginConfig) -> Result<()> {
    println!("👀 Watching {} for changes...", project_dir);

    let (tx, rx) = channel();
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            if let Ok(event) = res {
                if let Err(e) = tx.send(event) {
                    eprintln!("Watch error: {}", e);
                }
            }
        },
        notify::Config::default(),
    )
    .map_err(|e| {
        BuildError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("Failed to create file watcher: {}", e),
        ))
    })?;

    watcher
        .watch(Path::new(project_dir), RecursiveMode::Recursive)
        .map_err(|e| {
            BuildError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Failed to watch directory: {}", e),
            ))
        })?;

    if let Err(e) = build_and_report(project_dir, output_dir, &config) {
        eprintln!("❌ Initial build failed: {}", e);
    }

    loop {
        match rx.recv() {
            Ok(_event) => {
                println!("🔄 Files changed, rebuilding...");
                if let Err(e) = build_and_report(project_dir, output_dir, &config) {
                    eprintln!("❌ Build failed: {}", e);
                }
            }
            Err(e) => {
                eprintln!("Watch error: {}", e);
                break;
            }
        }
    }

    Ok(())
}

fn build_and_report(project_dir: &str, output_dir: &str, config: &PluginConfig) -> Result<()> {
    let output = build_project(project_dir, config)?;
    write_artifacts(&output, output_dir)?;
    for diagnostic in &output.diagnostics {
        eprintln!("❌ {}", diagnostic);
    }
    println!(
        "✅ Rebuilt: {} artifacts ({}ms)",
        output.artifacts.len(),
        output.stats.build_time_ms
    );
    Ok(())
}

/// Write every emitted artifact under the output directory, source maps as
/// `.map` siblings of their stylesheets.
fn write_artifacts(output: &BuildOutput, output_dir: &str) -> Result<()> {
    for artifact in &output.artifacts {
        let target = Path::new(output_dir).join(artifact.path());
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&target, artifact.data())?;

        if let EmittedArtifact::Stylesheet {
            source_map: Some(map),
            ..
        } = artifact
        {
            std::fs::write(target.with_extension("css.map"), map)?;
        }
        log::info!("wrote {}", target.display());
    }
    Ok(())
}

// --- CHECK ---
pub fn handle_check_command(cli: &super::Cli, matches: &clap::ArgMatches) -> Result<()> {
    let project_dir = matches.get_one::<String>("project").unwrap();
    let config = cli.build_config(matches);

    println!("🔍 Checking {}", project_dir);
    let output = build_project(project_dir, &config)?;

    for diagnostic in &output.diagnostics {
        println!("❌ {}", diagnostic);
    }

    if output.diagnostics.is_empty() {
        println!("✅ {} - No issues found", project_dir);
        Ok(())
    } else {
        Err(BuildError::InvalidFormat {
            message: format!("{} file(s) have errors", output.diagnostics.len()),
        })
    }
}

// --- HELPERS ---
fn print_detailed_stats(output: &BuildOutput, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&output.stats).map_err(|e| {
                BuildError::InvalidFormat {
                    message: format!("JSON serialization error: {}", e),
                }
            })?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            let stats = &output.stats;
            println!("\n📊 Detailed Build Statistics:");
            println!("   Input files: {}", stats.input_file_count);
            println!("   Included files: {}", stats.included_file_count);
            println!("   SCSS roots: {}", stats.scss_root_count);
            println!("   SCSS compiled: {}", stats.scss_compiled_count);
            println!("   SCSS errors: {}", stats.scss_error_count);
            println!("   Stylesheets: {}", stats.stylesheet_count);
            println!("   Scripts: {}", stats.script_count);
            println!("   Tokens: {}", stats.token_count);
            println!("   Build time: {}ms", stats.build_time_ms);
        }
    }
    Ok(())
}

//! Pipeline performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use cssmodc::*;

fn simple_files() -> Vec<SourceFile> {
    vec![SourceFile::new(
        "app.scss",
        "$pad: 4px;\n.app { padding: $pad; }",
    )]
}

fn project_files(file_count: usize) -> Vec<SourceFile> {
    let mut files = vec![SourceFile::new("_shared.scss", "$base: #336699;")];
    for i in 0..file_count {
        files.push(SourceFile::new(
            format!("pages/page{}.scss", i),
            format!(
                "@import \"../shared\";\n.page{} {{ color: $base; }}\n.title{} {{ composes: page{}; }}",
                i, i, i
            ),
        ));
    }
    files
}

fn bench_single_file(c: &mut Criterion) {
    let config = PluginConfig::default();
    c.bench_function("single_scss_file", |b| {
        b.iter(|| process_files_for_target(black_box(simple_files()), black_box(&config)).unwrap())
    });
}

fn bench_project_sizes(c: &mut Criterion) {
    let config = PluginConfig::default();
    let mut group = c.benchmark_group("project_sizes");

    for file_count in [10, 50, 200] {
        group.bench_with_input(
            format!("files_{}", file_count),
            &file_count,
            |b, &file_count| {
                b.iter(|| {
                    process_files_for_target(
                        black_box(project_files(file_count)),
                        black_box(&config),
                    )
                    .unwrap()
                })
            },
        );
    }

    group.finish();
}

fn bench_global_variables(c: &mut Criterion) {
    let mut variables = serde_json::Map::new();
    for i in 0..100 {
        variables.insert(format!("var{}", i), serde_json::json!(i));
    }
    let config = PluginConfig {
        plugins: vec![TransformPluginConfig {
            name: SIMPLE_VARS_PLUGIN.to_string(),
            variables: Some(variables),
        }],
        ..PluginConfig::default()
    };

    let files = || {
        vec![SourceFile::new(
            "app.scss",
            ".app { width: $var42; height: $var99; }",
        )]
    };

    c.bench_function("global_variable_injection", |b| {
        b.iter(|| process_files_for_target(black_box(files()), black_box(&config)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_single_file,
    bench_project_sizes,
    bench_global_variables
);

criterion_main!(benches);

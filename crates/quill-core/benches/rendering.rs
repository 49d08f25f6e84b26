//! Benchmarks for document rendering.

#![allow(clippy::format_push_string)] // Benchmark setup code, performance not critical

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use quill_config::Config;
use quill_core::Engine;
use quill_renderer::parse_markdown;

/// Generate markdown with `sections` sections, each holding a paragraph, a
/// code block and a small table.
fn generate_markdown(sections: usize) -> String {
    let mut md = String::with_capacity(sections * 256);
    md.push_str("# Document Title\n\n");
    for i in 0..sections {
        md.push_str(&format!("## Section {i}\n\n"));
        md.push_str("Some **bold** and *italic* text with `code`.\n\n");
        md.push_str(&format!(
            "```rust\nfn section_{i}() -> usize {{\n    {i} + 1\n}}\n```\n\n"
        ));
        md.push_str("| Name | Value |\n|------|------:|\n");
        md.push_str(&format!("| item{i} | {i} |\n\n"));
    }
    md
}

fn bench_render_markdown(c: &mut Criterion) {
    let engine = Engine::bootstrap(&Config::default()).unwrap();
    let mut group = c.benchmark_group("render_markdown");

    for sections in [1, 10, 50] {
        let markdown = generate_markdown(sections);
        group.throughput(Throughput::Bytes(markdown.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(sections),
            &markdown,
            |b, md| b.iter(|| engine.render_markdown(md)),
        );
    }
    group.finish();
}

fn bench_render_tree_only(c: &mut Criterion) {
    let mut config = Config::default();
    config.highlight.enabled = false;
    let engine = Engine::bootstrap(&config).unwrap();
    let document = parse_markdown(&generate_markdown(50), true);

    c.bench_function("render_document_without_highlighting", |b| {
        b.iter(|| engine.render_document(&document));
    });
}

criterion_group!(benches, bench_render_markdown, bench_render_tree_only);
criterion_main!(benches);

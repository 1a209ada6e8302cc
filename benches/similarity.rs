//! Content Similarity Benchmarks
//!
//! Run with: cargo bench --bench similarity

use std::path::PathBuf;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use plugin_validate::architecture::similarity::{
    detect_similar_pairs, extract_ngrams, jaccard_similarity, NGRAM_SIZE,
};
use plugin_validate::{Layer, LayeredFile};

fn document(seed: usize, lines: usize) -> String {
    (0..lines)
        .map(|i| {
            format!(
                "- Step {} reviews module {} and records finding {} in the tracker",
                i,
                (i * 7 + seed) % 13,
                (i * 3 + seed) % 17
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn layered(plugin: &str, name: &str, layer: Layer, body: String) -> LayeredFile {
    let rel = format!("plugins/{}/{}.md", plugin, name);
    LayeredFile {
        path: PathBuf::from(&rel),
        rel_path: rel,
        layer,
        plugin: plugin.to_string(),
        body,
        frontmatter: None,
    }
}

fn benchmark_extract_ngrams(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_ngrams");

    for lines in [50, 300, 1000].iter() {
        let body = document(1, *lines);
        group.throughput(Throughput::Bytes(body.len() as u64));
        group.bench_with_input(format!("{}_lines", lines), &body, |b, body| {
            b.iter(|| extract_ngrams(black_box(body), NGRAM_SIZE));
        });
    }

    group.finish();
}

fn benchmark_jaccard(c: &mut Criterion) {
    let a = extract_ngrams(&document(1, 500), NGRAM_SIZE);
    let b = extract_ngrams(&document(2, 500), NGRAM_SIZE);

    c.bench_function("jaccard_500_lines", |bench| {
        bench.iter(|| jaccard_similarity(black_box(&a), black_box(&b)));
    });
}

fn benchmark_plugin_pairs(c: &mut Criterion) {
    let layers = [Layer::Command, Layer::Agent, Layer::Skill];
    let files: Vec<LayeredFile> = (0..24)
        .map(|i| layered("bench", &format!("f{}", i), layers[i % 3], document(i, 120)))
        .collect();
    let refs: Vec<&LayeredFile> = files.iter().collect();

    c.bench_function("detect_similar_pairs_24_files", |b| {
        b.iter(|| detect_similar_pairs(black_box(&refs)));
    });
}

criterion_group!(
    benches,
    benchmark_extract_ngrams,
    benchmark_jaccard,
    benchmark_plugin_pairs
);
criterion_main!(benches);

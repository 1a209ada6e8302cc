//! Cross-layer content similarity
//!
//! Prose copy-pasted between a skill and its parent command (or agent) should
//! live once, in the lowest layer that needs it. Each file body is cleaned,
//! tokenized and turned into a set of word 3-grams; every cross-layer pair in
//! the same plugin is compared with Jaccard similarity.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use tracing::debug;

use super::{CheckType, Finding, Layer, LayeredFile, Results, Severity};

/// Words per n-gram.
pub const NGRAM_SIZE: usize = 3;

/// Jaccard score at or above which a pair is flagged.
pub const SIMILARITY_THRESHOLD: f64 = 0.30;

/// Files with fewer n-grams are too short to compare.
pub const MIN_NGRAMS: usize = 20;

/// Cleaned lines shorter than this (in characters) are noise.
pub const MIN_CLEAN_LINE_LEN: usize = 10;

/// Shared n-grams quoted per flagged pair.
pub const MAX_SHARED_SAMPLES: usize = 5;

/// Set of word n-grams of one document.
pub type NgramSet = HashSet<String>;

/// Two files from different layers with overlapping content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityPair {
    pub file_a: String,
    pub layer_a: Layer,
    pub file_b: String,
    pub layer_b: Layer,
    /// Jaccard score in `[0, 1]`.
    pub similarity: f64,
    /// Sorted sample of shared n-grams.
    pub shared: Vec<String>,
}

/// Record similarity findings, one passing finding per clean plugin.
pub fn validate_content_similarity(files: &[LayeredFile], results: &mut Results) {
    let mut by_plugin: BTreeMap<&str, Vec<&LayeredFile>> = BTreeMap::new();
    for file in files {
        by_plugin.entry(file.plugin.as_str()).or_default().push(file);
    }

    for (plugin, plugin_files) in by_plugin {
        let pairs = detect_similar_pairs(&plugin_files);
        debug!(plugin = %plugin, flagged = pairs.len(), "Compared plugin content");

        if pairs.is_empty() {
            results.record(Finding::new(
                format!("plugins/{}", plugin),
                CheckType::ContentSimilarity,
                Severity::Warning,
                Vec::new(),
            ));
            continue;
        }

        for pair in pairs {
            let mut messages = vec![format!(
                "{:.0}% content overlap with {} ({}↔{} layer) — consider extracting shared content to a lower layer",
                pair.similarity * 100.0,
                pair.file_b,
                pair.layer_a,
                pair.layer_b,
            )];
            if !pair.shared.is_empty() {
                let quoted: Vec<String> = pair.shared.iter().map(|s| format!("\"{}\"", s)).collect();
                messages.push(format!("shared phrases: {}", quoted.join(", ")));
            }

            results.record(Finding::new(
                pair.file_a,
                CheckType::ContentSimilarity,
                Severity::Warning,
                messages,
            ));
        }
    }
}

/// Cross-layer pairs of `files` whose similarity reaches the threshold.
pub fn detect_similar_pairs(files: &[&LayeredFile]) -> Vec<SimilarityPair> {
    let candidates: Vec<(&LayeredFile, NgramSet)> = files
        .iter()
        .map(|file| (*file, extract_ngrams(&file.body, NGRAM_SIZE)))
        .filter(|(_, ngrams)| ngrams.len() >= MIN_NGRAMS)
        .collect();

    let mut pairs = Vec::new();
    for (i, (a, a_ngrams)) in candidates.iter().enumerate() {
        for (b, b_ngrams) in &candidates[i + 1..] {
            if a.layer == b.layer {
                continue;
            }

            let similarity = jaccard_similarity(a_ngrams, b_ngrams);
            if similarity >= SIMILARITY_THRESHOLD {
                pairs.push(SimilarityPair {
                    file_a: a.rel_path.clone(),
                    layer_a: a.layer,
                    file_b: b.rel_path.clone(),
                    layer_b: b.layer,
                    similarity,
                    shared: sample_shared_ngrams(a_ngrams, b_ngrams, MAX_SHARED_SAMPLES),
                });
            }
        }
    }

    pairs
}

/// Word n-grams of `text` after cleaning.
pub fn extract_ngrams(text: &str, n: usize) -> NgramSet {
    let words = tokenize(&clean_for_similarity(text));
    if n == 0 || words.len() < n {
        return NgramSet::new();
    }
    words.windows(n).map(|w| w.join(" ")).collect()
}

/// Strip code blocks, structure and markers; lowercase what remains.
pub fn clean_for_similarity(text: &str) -> String {
    let mut cleaned = Vec::new();
    let mut in_code_block = false;

    for line in text.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with("```") {
            in_code_block = !in_code_block;
            continue;
        }
        if in_code_block || trimmed.is_empty() || trimmed == "---" || trimmed == "===" {
            continue;
        }

        let text = strip_list_marker(trimmed.trim_start_matches(['#', ' ']));
        if text.chars().count() < MIN_CLEAN_LINE_LEN {
            continue;
        }
        cleaned.push(text.to_lowercase());
    }

    cleaned.join(" ")
}

fn strip_list_marker(line: &str) -> &str {
    ["- [ ] ", "- [x] ", "- ", "* "]
        .iter()
        .find_map(|marker| line.strip_prefix(marker))
        .unwrap_or(line)
}

/// Split on whitespace, keep letters, digits, `-` and `_`, drop 1-character tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
                .collect::<String>()
        })
        .filter(|word| word.chars().count() >= 2)
        .collect()
}

/// `|A ∩ B| / |A ∪ B|`, zero when either set is empty.
pub fn jaccard_similarity(a: &NgramSet, b: &NgramSet) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let intersection = small.iter().filter(|gram| large.contains(*gram)).count();
    let union = a.len() + b.len() - intersection;

    intersection as f64 / union as f64
}

/// Up to `max` shared n-grams, sorted.
pub fn sample_shared_ngrams(a: &NgramSet, b: &NgramSet, max: usize) -> Vec<String> {
    let mut shared: Vec<String> = a.intersection(b).cloned().collect();
    shared.sort();
    shared.truncate(max);
    shared
}

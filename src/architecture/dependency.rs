//! Layer dependency direction
//!
//! Allowed direction is Command → Agent → Skill. A skill must not name an
//! agent or a command, and an agent must not name a command. Commands are the
//! top layer and are never checked.

use serde::Serialize;
use tracing::debug;

use super::patterns::{LineClass, LineScanner, ReferenceKind, REFERENCE_RULES};
use super::{is_violation, CheckType, Finding, Layer, LayeredFile, Results, Severity};

/// A cross-layer reference found on one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    pub target: Layer,
    /// Matched text.
    pub matched: String,
    /// 1-based line number within the body.
    pub line: usize,
    pub kind: ReferenceKind,
}

/// Record one `layer-dependency` finding per file.
pub fn validate_layer_dependencies(files: &[LayeredFile], results: &mut Results) {
    for file in files {
        let violations: Vec<String> = detect_references(file)
            .into_iter()
            .filter(|r| is_violation(file.layer, r.target))
            .map(|r| violation_message(file.layer, &r))
            .collect();

        if !violations.is_empty() {
            debug!(
                file = %file.rel_path,
                violations = violations.len(),
                "Upward layer references"
            );
        }

        results.record(Finding::new(
            file.rel_path.clone(),
            CheckType::LayerDependency,
            Severity::Error,
            violations,
        ));
    }
}

/// Scan a file for references to layers above it.
///
/// Fenced code, example blocks, documentation lines and `arch-ignore` lines
/// are skipped.
pub fn detect_references(file: &LayeredFile) -> Vec<Reference> {
    if file.layer == Layer::Command {
        return Vec::new();
    }

    let mut scanner = LineScanner::new();
    let mut refs = Vec::new();

    for (i, line) in file.lines().enumerate() {
        if scanner.classify(line) != LineClass::Content {
            continue;
        }
        refs.extend(detect_upward_refs(line, i + 1, file.layer));
    }

    refs
}

/// References on a single line from `source` to any layer above it.
pub fn detect_upward_refs(line: &str, line_num: usize, source: Layer) -> Vec<Reference> {
    let mut refs = Vec::new();
    let mut saw_invocation = false;

    for rule in REFERENCE_RULES
        .iter()
        .filter(|rule| is_violation(source, rule.target))
    {
        if rule.kind.is_invocation() && saw_invocation {
            continue;
        }

        let matches = rule.matches(line);
        if matches.is_empty() {
            continue;
        }
        saw_invocation |= rule.kind.is_invocation();

        refs.extend(matches.into_iter().map(|m| Reference {
            target: rule.target,
            matched: m.to_string(),
            line: line_num,
            kind: rule.kind,
        }));
    }

    refs
}

fn violation_message(source: Layer, reference: &Reference) -> String {
    format!(
        "line {}: {} references {} layer via {} ({}) — violates {} → {} direction",
        reference.line,
        source,
        reference.target,
        reference.kind.as_str(),
        reference.matched,
        reference.target,
        source,
    )
}

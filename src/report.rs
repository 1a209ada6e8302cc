//! Report rendering
//!
//! Turns [`Results`] into the human-readable text report or the JSON envelope
//! printed by the `plugin-validate` binary. Rendering returns a `String` so it
//! can be tested without capturing stdout.

use std::fmt::Write;

use serde::Serialize;

use crate::architecture::{Finding, Results};
use crate::error::Result;

const RULE: &str = "========================================";

/// JSON output envelope: `{"ok": ..., "data": ...}`.
#[derive(Debug, Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

/// Pretty-printed JSON envelope; `ok` is false when anything failed.
pub fn render_json(results: &Results) -> Result<String> {
    let out = JsonOut {
        ok: results.is_success(),
        data: results,
    };
    Ok(serde_json::to_string_pretty(&out)?)
}

/// Text report: failures, warnings, passes (listed only when `verbose`), summary.
pub fn render_text(results: &Results, verbose: bool) -> String {
    let mut out = String::new();

    for finding in &results.failed {
        write_finding(&mut out, '✗', finding);
    }
    for finding in &results.warnings {
        write_finding(&mut out, '⚠', finding);
    }

    if verbose {
        for finding in &results.passed {
            let _ = writeln!(out, "  ✓ {}", finding.file);
            let _ = writeln!(out, "    Type: {}", finding.check);
        }
    } else if !results.passed.is_empty() {
        let _ = writeln!(out, "  ✓ {} checks passed", results.passed.len());
    }

    out.push('\n');
    out.push_str(&render_summary(results));
    out
}

/// Closing summary block with the three bucket counts and the verdict.
pub fn render_summary(results: &Results) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "  Summary");
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "  ✓ Passed: {}", results.passed.len());
    let _ = writeln!(out, "  ⚠ Warnings: {}", results.warnings.len());
    let _ = writeln!(out, "  ✗ Failed: {}", results.failed.len());
    out.push('\n');

    if results.is_success() {
        let _ = writeln!(out, "✅ Validation PASSED");
    } else {
        let _ = writeln!(out, "❌ Validation FAILED");
    }
    out
}

fn write_finding(out: &mut String, marker: char, finding: &Finding) {
    let _ = writeln!(out, "  {} {}", marker, finding.file);
    let _ = writeln!(out, "    Type: {}", finding.check);
    for message in &finding.messages {
        let _ = writeln!(out, "    → {}", message);
    }
    out.push('\n');
}

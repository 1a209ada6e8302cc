//! Layered-architecture validation for plugin packages
//!
//! Plugin files live in three layers with a fixed dependency direction:
//!
//! ```text
//! Command (0)  user entry point, may reference agents and skills
//!    ↓
//! Agent   (1)  orchestration, may reference skills
//!    ↓
//! Skill   (2)  single responsibility, references nothing above it
//! ```
//!
//! A validation run classifies every layer file once and then runs
//! independent read-only passes over that list:
//!
//! - **classifier**: discovery, layer tagging, plugin / skill name extraction
//! - **patterns**: the tagged pattern table and the per-file line scanner
//! - **dependency**: upward references (Skill → Agent/Command, Agent → Command)
//! - **similarity**: word 3-gram Jaccard overlap across layers of a plugin
//! - **responsibility**: fat commands, orchestrating skills, interactive agents
//! - **reference**: agent-declared skills vs. existing skills, skill coverage
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use plugin_validate::architecture::validate;
//!
//! let results = validate(Path::new(".")).unwrap();
//! println!(
//!     "{} passed, {} failed, {} warnings",
//!     results.passed.len(),
//!     results.failed.len(),
//!     results.warnings.len()
//! );
//! ```

pub mod classifier;
pub mod dependency;
pub mod patterns;
pub mod reference;
pub mod responsibility;
pub mod similarity;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::Lines;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, ValidateError};
use crate::markdown::{Frontmatter, FsMarkdownSource, MarkdownSource};

pub use classifier::collect_layer_files;
pub use dependency::Reference;
pub use patterns::{LineClass, LineScanner, ReferenceKind};
pub use similarity::SimilarityPair;

// ---------------------------------------------------------------------------
// Layer
// ---------------------------------------------------------------------------

/// Architectural layer of a plugin file, ordered by allowed dependency direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    /// Controller layer, the user entry point.
    Command,
    /// Service layer, orchestration.
    Agent,
    /// Domain layer, single responsibility.
    Skill,
}

impl Layer {
    /// Numeric rank: Command 0, Agent 1, Skill 2.
    pub fn rank(self) -> u8 {
        match self {
            Layer::Command => 0,
            Layer::Agent => 1,
            Layer::Skill => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Layer::Command => "command",
            Layer::Agent => "agent",
            Layer::Skill => "skill",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a reference from `source` to `target` points up the layer stack.
///
/// Command → Agent, Command → Skill and Agent → Skill are allowed, as are
/// same-layer references. Everything else is a violation.
pub fn is_violation(source: Layer, target: Layer) -> bool {
    source.rank() > target.rank()
}

// ---------------------------------------------------------------------------
// Layered file
// ---------------------------------------------------------------------------

/// A discovered plugin file tagged with its layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayeredFile {
    /// Absolute path on disk.
    pub path: PathBuf,
    /// Path relative to the repository root, `/`-separated.
    pub rel_path: String,
    pub layer: Layer,
    /// Owning plugin (directory name under `plugins/`).
    pub plugin: String,
    /// Markdown body after the frontmatter block.
    pub body: String,
    pub frontmatter: Option<Frontmatter>,
}

impl LayeredFile {
    /// Body lines, 1-based numbering is `index + 1`.
    pub fn lines(&self) -> Lines<'_> {
        self.body.lines()
    }

    pub fn line_count(&self) -> usize {
        self.body.lines().count()
    }

    /// Skills listed in the `skills` frontmatter key, trimmed, blanks removed.
    pub fn declared_skills(&self) -> Vec<String> {
        self.frontmatter
            .as_ref()
            .map(|fm| fm.get_string_list("skills"))
            .unwrap_or_default()
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// File name without the `.md` extension.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Findings
// ---------------------------------------------------------------------------

/// Which pass produced a finding.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum CheckType {
    LayerDependency,
    ContentSimilarity,
    Responsibility,
    SkillReference,
    SkillCoverage,
}

impl CheckType {
    pub fn as_str(self) -> &'static str {
        match self {
            CheckType::LayerDependency => "layer-dependency",
            CheckType::ContentSimilarity => "content-similarity",
            CheckType::Responsibility => "responsibility",
            CheckType::SkillReference => "skill-reference",
            CheckType::SkillCoverage => "skill-coverage",
        }
    }
}

impl fmt::Display for CheckType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a failed finding is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// One check result for one file (or plugin).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    /// Repository-relative path the finding is about.
    pub file: String,
    #[serde(rename = "type")]
    pub check: CheckType,
    pub valid: bool,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<String>,
}

impl Finding {
    /// Build a finding; it is valid iff `messages` is empty.
    pub fn new(
        file: impl Into<String>,
        check: CheckType,
        severity: Severity,
        messages: Vec<String>,
    ) -> Self {
        Self {
            file: file.into(),
            check,
            valid: messages.is_empty(),
            severity,
            messages,
        }
    }
}

/// Accumulated findings of one validation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Results {
    pub passed: Vec<Finding>,
    pub failed: Vec<Finding>,
    pub warnings: Vec<Finding>,
}

impl Results {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route a finding: valid → passed, invalid error → failed, invalid warning → warnings.
    pub fn record(&mut self, finding: Finding) {
        match (finding.valid, finding.severity) {
            (true, _) => self.passed.push(finding),
            (false, Severity::Error) => self.failed.push(finding),
            (false, Severity::Warning) => self.warnings.push(finding),
        }
    }

    /// True when nothing failed. Warnings never fail a run.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.passed.len() + self.failed.len() + self.warnings.len()
    }

    /// All findings of one check type, in passed / failed / warnings order.
    pub fn of_type(&self, check: CheckType) -> impl Iterator<Item = &Finding> {
        self.passed
            .iter()
            .chain(&self.failed)
            .chain(&self.warnings)
            .filter(move |f| f.check == check)
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Which passes a run executes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidateOptions {
    /// Checks to leave out. Empty runs everything.
    pub skip: Vec<CheckType>,
}

impl ValidateOptions {
    pub fn enabled(&self, check: CheckType) -> bool {
        !self.skip.contains(&check)
    }
}

/// Validate the repository at `repo_root` with every check enabled.
pub fn validate(repo_root: &Path) -> Result<Results> {
    validate_with(repo_root, &ValidateOptions::default(), &FsMarkdownSource)
}

/// Validate the repository at `repo_root`.
///
/// Per-file problems never abort the run; only a missing root or a discovery
/// failure returns an error.
pub fn validate_with(
    repo_root: &Path,
    options: &ValidateOptions,
    source: &dyn MarkdownSource,
) -> Result<Results> {
    if !repo_root.is_dir() {
        return Err(ValidateError::Config(format!(
            "repository root is not a directory: {}",
            repo_root.display()
        )));
    }
    let repo_root = &repo_root.canonicalize()?;

    let mut results = Results::new();
    let files = collect_layer_files(repo_root, source)?;
    debug!(files = files.len(), "Classified layer files");

    if files.is_empty() {
        info!(root = %repo_root.display(), "No layer files found");
        return Ok(results);
    }

    if options.enabled(CheckType::LayerDependency) {
        dependency::validate_layer_dependencies(&files, &mut results);
    }
    if options.enabled(CheckType::ContentSimilarity) {
        similarity::validate_content_similarity(&files, &mut results);
    }
    if options.enabled(CheckType::Responsibility) {
        responsibility::validate_responsibilities(&files, &mut results);
    }
    if options.enabled(CheckType::SkillReference) {
        reference::validate_skill_references(&files, &mut results);
    }
    if options.enabled(CheckType::SkillCoverage) {
        reference::validate_skill_coverage(&files, repo_root, &mut results);
    }

    info!(
        files = files.len(),
        passed = results.passed.len(),
        failed = results.failed.len(),
        warnings = results.warnings.len(),
        "Architecture validation finished"
    );

    Ok(results)
}

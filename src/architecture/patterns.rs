//! Pattern table and line suppression
//!
//! Every recognizer is an entry in one of the static tables below so it can be
//! tested on its own, independent of the checks that consume it. Natural
//! language phrasing is matched in English and Korean.

use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::Layer;

// ---------------------------------------------------------------------------
// Reference rules (dependency direction)
// ---------------------------------------------------------------------------

/// How a cross-layer reference was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferenceKind {
    /// `agents/<name>`, `commands/<name>`, `skills/<name>`
    Path,
    /// `/plugin:command`
    SlashCommand,
    /// `subagent_type=...` or "invoke agent" phrasing
    AgentInvocation,
    /// `Task(... subagent ...)`
    TaskCall,
}

impl ReferenceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ReferenceKind::Path => "path",
            ReferenceKind::SlashCommand => "slash-command",
            ReferenceKind::AgentInvocation => "agent-invocation",
            ReferenceKind::TaskCall => "task-call",
        }
    }

    /// Invocation kinds describe the same idiom; a line records at most one.
    pub fn is_invocation(self) -> bool {
        matches!(self, ReferenceKind::AgentInvocation | ReferenceKind::TaskCall)
    }
}

/// A recognizer for text that names another layer.
#[derive(Debug)]
pub struct ReferenceRule {
    pub name: &'static str,
    pub target: Layer,
    pub kind: ReferenceKind,
    /// Report every occurrence on a line instead of the first one.
    pub every_match: bool,
    regex: Regex,
}

impl ReferenceRule {
    fn new(
        name: &'static str,
        pattern: &str,
        target: Layer,
        kind: ReferenceKind,
        every_match: bool,
    ) -> Self {
        Self {
            name,
            target,
            kind,
            every_match,
            regex: compile(pattern),
        }
    }

    /// First matched substring on `line`.
    pub fn find<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.regex.find(line).map(|m| m.as_str())
    }

    /// Matched substrings on `line`, honoring `every_match`.
    pub fn matches<'a>(&self, line: &'a str) -> Vec<&'a str> {
        if self.every_match {
            self.regex.find_iter(line).map(|m| m.as_str()).collect()
        } else {
            self.find(line).into_iter().collect()
        }
    }
}

/// Cross-layer reference rules, in detection order.
pub static REFERENCE_RULES: Lazy<Vec<ReferenceRule>> = Lazy::new(|| {
    vec![
        ReferenceRule::new(
            "slash-command",
            r"/[a-z][\w-]+:[a-z][\w-]+",
            Layer::Command,
            ReferenceKind::SlashCommand,
            true,
        ),
        ReferenceRule::new(
            "command-path",
            r"(?:\./?)?commands/[a-z][a-z0-9-]+",
            Layer::Command,
            ReferenceKind::Path,
            false,
        ),
        ReferenceRule::new(
            "task-call",
            r"(?i)Task\s*\(.*subagent",
            Layer::Agent,
            ReferenceKind::TaskCall,
            false,
        ),
        ReferenceRule::new(
            "subagent-type",
            r#"(?i)subagent_type\s*[=:]\s*["']?\w+"#,
            Layer::Agent,
            ReferenceKind::AgentInvocation,
            false,
        ),
        ReferenceRule::new(
            "agent-call",
            r"(?i)(?:에이전트|agent)\s+(?:호출|실행|call|invoke|spawn|launch)",
            Layer::Agent,
            ReferenceKind::AgentInvocation,
            false,
        ),
        ReferenceRule::new(
            "agent-path",
            r"(?:\./?)?agents/[a-z][a-z0-9-]+",
            Layer::Agent,
            ReferenceKind::Path,
            false,
        ),
        ReferenceRule::new(
            "skill-path",
            r"(?:\./?)?skills/[a-z][a-z0-9-]+",
            Layer::Skill,
            ReferenceKind::Path,
            false,
        ),
    ]
});

// ---------------------------------------------------------------------------
// Hint rules (responsibility heuristics)
// ---------------------------------------------------------------------------

/// Responsibility category a hint belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HintCategory {
    /// Delegation / parallel execution, belongs in the agent layer.
    Orchestration,
    /// Asking the user for input, belongs in the command layer.
    UserInteraction,
    /// Evaluation and branching logic that should not pile up in commands.
    BusinessLogic,
}

impl HintCategory {
    /// Phrase used in responsibility messages.
    pub fn description(self) -> &'static str {
        match self {
            HintCategory::Orchestration => "orchestration logic",
            HintCategory::UserInteraction => "user interaction",
            HintCategory::BusinessLogic => "business logic",
        }
    }

    /// Layer the matched text should move to.
    pub fn belongs_to(self) -> Layer {
        match self {
            HintCategory::Orchestration | HintCategory::BusinessLogic => Layer::Agent,
            HintCategory::UserInteraction => Layer::Command,
        }
    }

    /// Rules of this category.
    pub fn rules(self) -> &'static [HintRule] {
        match self {
            HintCategory::Orchestration => &ORCHESTRATION_RULES,
            HintCategory::UserInteraction => &USER_INTERACTION_RULES,
            HintCategory::BusinessLogic => &BUSINESS_LOGIC_RULES,
        }
    }
}

/// A recognizer for phrasing that hints at a layer's responsibility.
#[derive(Debug)]
pub struct HintRule {
    pub name: &'static str,
    pub category: HintCategory,
    regex: Regex,
}

impl HintRule {
    fn new(name: &'static str, category: HintCategory, pattern: &str) -> Self {
        Self {
            name,
            category,
            regex: compile(pattern),
        }
    }

    pub fn find<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.regex.find(line).map(|m| m.as_str())
    }

    pub fn is_match(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }
}

pub static ORCHESTRATION_RULES: Lazy<Vec<HintRule>> = Lazy::new(|| {
    let o = HintCategory::Orchestration;
    vec![
        HintRule::new("task-call", o, r"(?i)Task\s*\("),
        HintRule::new("subagent-type", o, r"(?i)subagent_type"),
        HintRule::new(
            "delegate-agent",
            o,
            r"(?i)(?:spawn|launch|delegate)\s+(?:agent|에이전트|worker)",
        ),
        HintRule::new("parallel-ko", o, r"(?i)병렬\s*(?:실행|처리|에이전트)"),
        HintRule::new(
            "parallel-en",
            o,
            r"(?i)parallel\s+(?:execution|agents?|workers?)",
        ),
    ]
});

pub static USER_INTERACTION_RULES: Lazy<Vec<HintRule>> = Lazy::new(|| {
    let u = HintCategory::UserInteraction;
    vec![
        HintRule::new(
            "user-input",
            u,
            r"(?i)(?:사용자|user)\s*(?:입력|input|확인|confirm)",
        ),
        HintRule::new("ask-user", u, r"(?i)(?:ask|prompt)\s+(?:the\s+)?user"),
        HintRule::new("argument-hint", u, r"(?i)argument-hint"),
        HintRule::new("magic-keyword", u, r"(?i)Magic\s+Keyword"),
    ]
});

pub static BUSINESS_LOGIC_RULES: Lazy<Vec<HintRule>> = Lazy::new(|| {
    let b = HintCategory::BusinessLogic;
    vec![
        HintRule::new(
            "evaluation-criteria",
            b,
            r"(?i)(?:평가|evaluate|분석|analyze|검토|review)\s+(?:기준|criteria|항목|점수|score)",
        ),
        HintRule::new("score-comparison", b, r"(?i)(?:점수|score)\s*[><=]+\s*\d+"),
        HintRule::new(
            "conditional-branch",
            b,
            r"(?i)(?:if|else|switch|case)\s+.*(?:then|do|→)",
        ),
    ]
});

fn compile(pattern: &str) -> Regex {
    // Table patterns are literals covered by tests.
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {pattern}: {e}"))
}

// ---------------------------------------------------------------------------
// Line suppression
// ---------------------------------------------------------------------------

const FENCE: &str = "```";
const EXAMPLE_LABELS: [&str; 2] = ["example", "예시"];

static DIAGRAM_GLYPHS: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::new(["───", "│", "┌", "└", "├", "→"])
        .unwrap_or_else(|e| panic!("invalid diagram glyph set: {e}"))
});

static ARCH_IGNORE: Lazy<Regex> = Lazy::new(|| compile(r"<!--\s*arch-ignore\s*-->"));

/// Whether a trimmed line is diagram art, a table row or an HTML comment delimiter.
pub fn is_documentation_line(trimmed: &str) -> bool {
    if DIAGRAM_GLYPHS.is_match(trimmed) {
        return true;
    }
    if trimmed.starts_with('|') && trimmed.ends_with('|') {
        return true;
    }
    trimmed.starts_with("<!--") || trimmed.starts_with("-->")
}

/// Whether the line carries an `<!-- arch-ignore -->` marker.
pub fn has_ignore_marker(line: &str) -> bool {
    ARCH_IGNORE.is_match(line)
}

fn is_example_fence(trimmed_fence: &str) -> bool {
    let lower = trimmed_fence.to_lowercase();
    EXAMPLE_LABELS.iter().any(|label| lower.contains(label))
}

/// How the scanner treats one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    /// A code fence delimiter.
    Fence,
    /// Inside a fenced code block.
    Code,
    /// Inside or trailing an example-labelled block.
    Example,
    /// Diagram, table row or comment delimiter.
    Documentation,
    /// Carries an inline ignore marker.
    Ignored,
    /// Ordinary prose; patterns apply.
    Content,
}

impl LineClass {
    /// True for lines outside any fenced code block.
    pub fn is_outside_code(self) -> bool {
        !matches!(self, LineClass::Fence | LineClass::Code)
    }
}

/// Per-file scanning state. Create one per file; never share across files.
///
/// An opening fence whose info string mentions an example sets the example
/// flag. The flag survives the closing fence and is cleared by the next
/// opening fence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineScanner {
    in_code_block: bool,
    in_example_block: bool,
}

impl LineScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_code_block(&self) -> bool {
        self.in_code_block
    }

    pub fn in_example_block(&self) -> bool {
        self.in_example_block
    }

    /// Classify `line` and advance the fence state.
    pub fn classify(&mut self, line: &str) -> LineClass {
        let trimmed = line.trim();

        if trimmed.starts_with(FENCE) {
            if self.in_code_block {
                self.in_code_block = false;
            } else {
                self.in_code_block = true;
                self.in_example_block = is_example_fence(trimmed);
            }
            return LineClass::Fence;
        }
        if self.in_code_block {
            return LineClass::Code;
        }
        if self.in_example_block {
            return LineClass::Example;
        }
        if is_documentation_line(trimmed) {
            return LineClass::Documentation;
        }
        if has_ignore_marker(line) {
            return LineClass::Ignored;
        }
        LineClass::Content
    }
}

//! Layer responsibility heuristics
//!
//! Each layer has a job: commands talk to the user, agents orchestrate, skills
//! do one thing. These checks flag text that drifts out of its layer. All
//! findings are warnings.

use tracing::debug;

use super::patterns::{HintCategory, LineClass, LineScanner};
use super::{CheckType, Finding, Layer, LayeredFile, Results, Severity};

/// Commands longer than this are a Fat Controller.
pub const COMMAND_MAX_LINES: usize = 500;

/// Commands longer than this deserve a second look.
pub const COMMAND_WARN_LINES: usize = 300;

/// Business-logic matches a command may carry before it is flagged.
pub const BUSINESS_LOGIC_LIMIT: usize = 10;

/// Record one `responsibility` finding per file.
pub fn validate_responsibilities(files: &[LayeredFile], results: &mut Results) {
    for file in files {
        let messages = match file.layer {
            Layer::Skill => scan_hints(
                file,
                &[HintCategory::Orchestration, HintCategory::UserInteraction],
            ),
            Layer::Agent => scan_hints(file, &[HintCategory::UserInteraction]),
            Layer::Command => check_command(file),
        };

        if !messages.is_empty() {
            debug!(file = %file.rel_path, hints = messages.len(), "Responsibility drift");
        }

        results.record(Finding::new(
            file.rel_path.clone(),
            CheckType::Responsibility,
            Severity::Warning,
            messages,
        ));
    }
}

/// Per-line hint matches of the given categories, one message per matching rule.
fn scan_hints(file: &LayeredFile, categories: &[HintCategory]) -> Vec<String> {
    let mut scanner = LineScanner::new();
    let mut messages = Vec::new();

    for (i, line) in file.lines().enumerate() {
        if scanner.classify(line) != LineClass::Content {
            continue;
        }

        for category in categories {
            for rule in category.rules() {
                if let Some(matched) = rule.find(line) {
                    messages.push(format!(
                        "line {}: {} contains {} ({}) — delegate to {} layer",
                        i + 1,
                        file.layer,
                        category.description(),
                        matched,
                        category.belongs_to(),
                    ));
                }
            }
        }
    }

    messages
}

fn check_command(file: &LayeredFile) -> Vec<String> {
    let mut messages = Vec::new();

    let line_count = file.line_count();
    if line_count > COMMAND_MAX_LINES {
        messages.push(format!(
            "command has {} lines (max recommended: {}) — consider extracting logic to agent/skill layers (Fat Controller anti-pattern)",
            line_count, COMMAND_MAX_LINES
        ));
    } else if line_count > COMMAND_WARN_LINES {
        messages.push(format!(
            "command has {} lines (warning threshold: {}) — review if business logic should move to agent/skill layers",
            line_count, COMMAND_WARN_LINES
        ));
    }

    let business_logic = count_business_logic(file);
    if business_logic > BUSINESS_LOGIC_LIMIT {
        messages.push(format!(
            "command contains {} business logic patterns — consider extracting evaluation/analysis logic to agent layer",
            business_logic
        ));
    }

    messages
}

/// Business-logic rule hits outside fenced code, each rule at most once per line.
pub fn count_business_logic(file: &LayeredFile) -> usize {
    let mut scanner = LineScanner::new();
    let rules = HintCategory::BusinessLogic.rules();

    file.lines()
        .filter(|line| scanner.classify(line).is_outside_code())
        .map(|line| rules.iter().filter(|rule| rule.is_match(line)).count())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn layered(layer: Layer, body: &str) -> LayeredFile {
        LayeredFile {
            path: PathBuf::from("/repo/plugins/p/file.md"),
            rel_path: "plugins/p/file.md".to_string(),
            layer,
            plugin: "p".to_string(),
            body: body.to_string(),
            frontmatter: None,
        }
    }

    fn command_of(lines: usize) -> LayeredFile {
        let body = (0..lines)
            .map(|i| format!("step {}", i))
            .collect::<Vec<_>>()
            .join("\n");
        layered(Layer::Command, &body)
    }

    fn messages_for(file: LayeredFile) -> Vec<String> {
        let mut results = Results::new();
        validate_responsibilities(&[file], &mut results);
        results
            .warnings
            .into_iter()
            .flat_map(|f| f.messages)
            .collect()
    }

    // ---- commands ----

    #[test]
    fn test_command_over_max_lines() {
        let messages = messages_for(command_of(501));
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("command has 501 lines (max recommended: 500)"));
        assert!(messages[0].ends_with("(Fat Controller anti-pattern)"));
    }

    #[test]
    fn test_command_over_warn_lines() {
        let messages = messages_for(command_of(301));
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("command has 301 lines (warning threshold: 300)"));
    }

    #[test]
    fn test_command_under_thresholds_passes() {
        let mut results = Results::new();
        validate_responsibilities(&[command_of(250)], &mut results);
        assert_eq!(results.passed.len(), 1);
        assert!(results.warnings.is_empty());
        assert_eq!(results.passed[0].check, CheckType::Responsibility);
    }

    #[test]
    fn test_command_business_logic_count() {
        let line = "Evaluate criteria: if score >= 80 then approve";
        let body = vec![line; 4].join("\n");
        // Three rules on each of four lines.
        assert_eq!(count_business_logic(&layered(Layer::Command, &body)), 12);

        let messages = messages_for(layered(Layer::Command, &body));
        assert_eq!(
            messages,
            vec!["command contains 12 business logic patterns — consider extracting evaluation/analysis logic to agent layer"]
        );
    }

    #[test]
    fn test_business_logic_ignores_code_blocks_only() {
        let body = "```\nif x then y\n```\n| if a then b |\nif c then d";
        assert_eq!(count_business_logic(&layered(Layer::Command, body)), 2);
    }

    // ---- skills & agents ----

    #[test]
    fn test_skill_orchestration_and_interaction() {
        let body = "# Skill\nSpawn agent for each file\nAsk the user which branch";
        let messages = messages_for(layered(Layer::Skill, body));
        assert_eq!(
            messages,
            vec![
                "line 2: skill contains orchestration logic (Spawn agent) — delegate to agent layer",
                "line 3: skill contains user interaction (Ask the user) — delegate to command layer",
            ]
        );
    }

    #[test]
    fn test_agent_ignores_orchestration() {
        let body = "Task(subagent_type=\"x\")\nPrompt user for confirmation";
        let messages = messages_for(layered(Layer::Agent, body));
        assert_eq!(
            messages,
            vec!["line 2: agent contains user interaction (Prompt user) — delegate to command layer"]
        );
    }

    #[test]
    fn test_suppressed_lines_skipped() {
        let body = "```\nTask(x)\n```\n| ask the user |\nparallel agents <!-- arch-ignore -->\n```text example\nspawn agent\n```\nspawn worker";
        let messages = messages_for(layered(Layer::Skill, body));
        assert!(messages.is_empty(), "{:?}", messages);
    }
}

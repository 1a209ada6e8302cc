//! Agent → skill declarations
//!
//! Agents list the skills they rely on in frontmatter (`skills: [...]`).
//! Every declared name must exist as a skill of the same plugin. A plugin
//! whose skills go entirely undeclared gets a coverage advisory.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::debug;

use super::classifier::{extract_skill_name, PLUGINS_DIR};
use super::{CheckType, Finding, Layer, LayeredFile, Results, Severity};

/// `"plugin/skill-name"` → repository-relative skill file path.
pub type SkillRegistry = BTreeMap<String, String>;

/// Index every skill file by `plugin/name`.
pub fn build_skill_registry(files: &[LayeredFile]) -> SkillRegistry {
    files
        .iter()
        .filter(|f| f.layer == Layer::Skill)
        .filter_map(|f| {
            extract_skill_name(&f.rel_path)
                .map(|name| (registry_key(&f.plugin, &name), f.rel_path.clone()))
        })
        .collect()
}

/// Record one `skill-reference` finding per agent that declares skills.
pub fn validate_skill_references(files: &[LayeredFile], results: &mut Results) {
    let registry = build_skill_registry(files);
    debug!(skills = registry.len(), "Built skill registry");

    for file in files.iter().filter(|f| f.layer == Layer::Agent) {
        let declared = file.declared_skills();
        if declared.is_empty() {
            continue;
        }

        let messages: Vec<String> = declared
            .iter()
            .filter(|name| !registry.contains_key(&registry_key(&file.plugin, name)))
            .map(|name| missing_skill_message(&file.plugin, name, &registry))
            .collect();

        results.record(Finding::new(
            file.rel_path.clone(),
            CheckType::SkillReference,
            Severity::Error,
            messages,
        ));
    }
}

fn missing_skill_message(plugin: &str, name: &str, registry: &SkillRegistry) -> String {
    let mut message = format!(
        "agent declares skill \"{}\" but it does not exist at {}/{}/skills/{}/SKILL.md",
        name, PLUGINS_DIR, plugin, name
    );
    if let Some(other) = find_skill_suggestion(name, registry) {
        message.push_str(&format!(" (found in {})", other));
    }
    message
}

/// `plugins/<other>` for the first plugin (in sorted order) that has a skill named `name`.
pub fn find_skill_suggestion(name: &str, registry: &SkillRegistry) -> Option<String> {
    registry.keys().find_map(|key| {
        key.split_once('/')
            .filter(|(_, skill)| *skill == name)
            .map(|(plugin, _)| format!("{}/{}", PLUGINS_DIR, plugin))
    })
}

/// Warn about plugins whose skills no agent declares.
///
/// Only plugins that have agents, registered skills and at least one skill
/// directory on disk are considered.
pub fn validate_skill_coverage(files: &[LayeredFile], repo_root: &Path, results: &mut Results) {
    let mut agents_by_plugin: BTreeMap<&str, Vec<&LayeredFile>> = BTreeMap::new();
    let mut skills_by_plugin: BTreeMap<&str, Vec<String>> = BTreeMap::new();

    for file in files {
        match file.layer {
            Layer::Agent => agents_by_plugin.entry(file.plugin.as_str()).or_default().push(file),
            Layer::Skill => {
                if let Some(name) = extract_skill_name(&file.rel_path) {
                    skills_by_plugin.entry(file.plugin.as_str()).or_default().push(name);
                }
            }
            Layer::Command => {}
        }
    }

    for (plugin, agents) in agents_by_plugin {
        let Some(skills) = skills_by_plugin.get(plugin).filter(|s| !s.is_empty()) else {
            continue;
        };
        if agents.iter().any(|a| !a.declared_skills().is_empty()) {
            continue;
        }
        if find_skill_dirs(repo_root, plugin).is_empty() {
            continue;
        }

        let agent_names: Vec<String> = agents.iter().map(|a| a.stem()).collect();
        debug!(plugin = %plugin, skills = skills.len(), agents = agents.len(), "Undeclared skills");

        results.record(Finding::new(
            format!("{}/{}/agents/", PLUGINS_DIR, plugin),
            CheckType::SkillCoverage,
            Severity::Warning,
            vec![format!(
                "plugin has {} skill(s) [{}] but none of {} agent(s) [{}] declare skills in frontmatter — consider adding skills: [...] to agent YAML",
                skills.len(),
                skills.join(", "),
                agents.len(),
                agent_names.join(", "),
            )],
        ));
    }
}

/// Sorted names of directories directly under `plugins/<plugin>/skills/`.
pub fn find_skill_dirs(repo_root: &Path, plugin: &str) -> Vec<String> {
    let skills_dir = repo_root.join(PLUGINS_DIR).join(plugin).join("skills");
    let entries = match fs::read_dir(&skills_dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(dir = %skills_dir.display(), error = %e, "No skills directory");
            return Vec::new();
        }
    };

    let mut dirs: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .collect();
    dirs.sort();
    dirs
}

fn registry_key(plugin: &str, skill: &str) -> String {
    format!("{}/{}", plugin, skill)
}

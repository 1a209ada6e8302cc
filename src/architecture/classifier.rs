//! Layer file discovery and classification
//!
//! Walks the fixed `plugins/*/...` layouts, parses each match through a
//! [`MarkdownSource`] and tags it with its layer and owning plugin. Files that
//! cannot be read or whose frontmatter is malformed are logged at debug level
//! and left out; they never become findings.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use tracing::debug;

use super::{Layer, LayeredFile};
use crate::error::{Result, ValidateError};
use crate::markdown::MarkdownSource;

/// Root directory that holds every plugin package.
pub const PLUGINS_DIR: &str = "plugins";

/// Skill definition file name.
pub const SKILL_FILE: &str = "SKILL.md";

/// Discovery patterns, in scan order.
pub const LAYER_PATTERNS: [(&str, Layer); 4] = [
    ("plugins/*/commands/*.md", Layer::Command),
    ("plugins/*/skills/*/SKILL.md", Layer::Skill),
    ("plugins/*/skills/SKILL.md", Layer::Skill),
    ("plugins/*/agents/*.md", Layer::Agent),
];

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Discover, parse and classify all layer files under `repo_root`.
pub fn collect_layer_files(
    repo_root: &Path,
    source: &dyn MarkdownSource,
) -> Result<Vec<LayeredFile>> {
    let mut files = Vec::new();

    for (pattern, layer) in LAYER_PATTERNS {
        for path in discover(repo_root, pattern)? {
            let rel_path = relative_path(repo_root, &path);

            let doc = match source.load(&path) {
                Ok(doc) => doc,
                Err(e) => {
                    debug!(file = %rel_path, error = %e, "Unreadable layer file, skipping");
                    continue;
                }
            };

            if let Some(err) = doc.frontmatter.as_ref().and_then(|fm| fm.parse_error()) {
                debug!(file = %rel_path, error = %err, "Malformed frontmatter, skipping");
                continue;
            }

            files.push(LayeredFile {
                plugin: extract_plugin_name(&rel_path),
                body: doc.body_or_content().to_string(),
                frontmatter: doc.frontmatter,
                path,
                rel_path,
                layer,
            });
        }
    }

    Ok(files)
}

/// Layer of a repository-relative path, `None` when it matches no layer pattern.
pub fn classify_path(rel_path: &str) -> Option<Layer> {
    LAYER_PATTERNS.iter().find_map(|(pattern, layer)| {
        Pattern::new(pattern)
            .ok()
            .filter(|p| p.matches_with(rel_path, MATCH_OPTIONS))
            .map(|_| *layer)
    })
}

/// Plugin name from a relative path like `plugins/develop-workflow/commands/flow.md`.
pub fn extract_plugin_name(rel_path: &str) -> String {
    let mut parts = rel_path.split('/');
    match (parts.next(), parts.next()) {
        (Some(PLUGINS_DIR), Some(name)) if !name.is_empty() => name.to_string(),
        _ => "unknown".to_string(),
    }
}

/// Skill name from a skill file path.
///
/// - `plugins/team-claude/skills/feedback-routing/SKILL.md` → `feedback-routing`
/// - `plugins/git-utils/skills/SKILL.md` → `git-utils`
pub fn extract_skill_name(path: &str) -> Option<String> {
    let parts: Vec<&str> = path.split('/').collect();

    for (i, part) in parts.iter().enumerate() {
        if *part != "skills" {
            continue;
        }
        if parts.get(i + 2) == Some(&SKILL_FILE) {
            return Some(parts[i + 1].to_string());
        }
        if parts.get(i + 1) == Some(&SKILL_FILE) && i >= 2 && parts[i - 2] == PLUGINS_DIR {
            return Some(parts[i - 1].to_string());
        }
    }

    None
}

fn discover(repo_root: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let root = Pattern::escape(&repo_root.to_string_lossy());
    let full = format!("{}/{}", root.trim_end_matches('/'), pattern);

    let entries = glob::glob_with(&full, MATCH_OPTIONS)
        .map_err(|e| ValidateError::Discovery(format!("invalid pattern {}: {}", full, e)))?;

    let mut paths = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => paths.push(path),
            Ok(_) => {}
            Err(e) => debug!(error = %e, "Unreadable directory entry, skipping"),
        }
    }
    paths.sort();
    Ok(paths)
}

fn relative_path(repo_root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(repo_root).unwrap_or(path);
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();
    parts.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::{parse_markdown_str, FsMarkdownSource, MockMarkdownSource};
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    // ---- name extraction ----

    #[test]
    fn test_extract_plugin_name() {
        assert_eq!(
            extract_plugin_name("plugins/develop-workflow/commands/flow.md"),
            "develop-workflow"
        );
        assert_eq!(extract_plugin_name("docs/readme.md"), "unknown");
    }

    #[test]
    fn test_extract_skill_name_both_shapes() {
        assert_eq!(
            extract_skill_name("plugins/team-claude/skills/feedback-routing/SKILL.md"),
            Some("feedback-routing".to_string())
        );
        assert_eq!(
            extract_skill_name("plugins/git-utils/skills/SKILL.md"),
            Some("git-utils".to_string())
        );
        assert_eq!(extract_skill_name("plugins/p/agents/a.md"), None);
    }

    #[test]
    fn test_classify_path() {
        assert_eq!(classify_path("plugins/p/commands/go.md"), Some(Layer::Command));
        assert_eq!(classify_path("plugins/p/agents/a.md"), Some(Layer::Agent));
        assert_eq!(classify_path("plugins/p/skills/s/SKILL.md"), Some(Layer::Skill));
        assert_eq!(classify_path("plugins/p/skills/SKILL.md"), Some(Layer::Skill));
        assert_eq!(classify_path("plugins/p/commands/nested/go.md"), None);
        assert_eq!(classify_path("plugins/p/README.md"), None);
    }

    // ---- discovery ----

    #[test]
    fn test_collect_layer_files() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write(root, "plugins/alpha/commands/run.md", "---\nname: run\n---\nRun it");
        write(root, "plugins/alpha/agents/worker.md", "No frontmatter here");
        write(root, "plugins/alpha/skills/parse/SKILL.md", "---\nname: parse\n---\nParse");
        write(root, "plugins/beta/skills/SKILL.md", "---\nname: beta\n---\nBeta");
        write(root, "plugins/alpha/README.md", "ignored");

        let files = collect_layer_files(root, &FsMarkdownSource).unwrap();
        let summary: Vec<(&str, Layer, &str)> = files
            .iter()
            .map(|f| (f.rel_path.as_str(), f.layer, f.plugin.as_str()))
            .collect();

        assert_eq!(
            summary,
            vec![
                ("plugins/alpha/commands/run.md", Layer::Command, "alpha"),
                ("plugins/alpha/skills/parse/SKILL.md", Layer::Skill, "alpha"),
                ("plugins/beta/skills/SKILL.md", Layer::Skill, "beta"),
                ("plugins/alpha/agents/worker.md", Layer::Agent, "alpha"),
            ]
        );
        assert_eq!(files[0].body, "Run it");
        // No frontmatter: the whole content is the body.
        assert_eq!(files[3].body, "No frontmatter here");
    }

    #[test]
    fn test_collect_skips_malformed_frontmatter() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "plugins/p/agents/bad.md", "---\nskills: [oops\n---\nBody");
        write(tmp.path(), "plugins/p/agents/good.md", "---\nskills: [ok]\n---\nBody");

        let files = collect_layer_files(tmp.path(), &FsMarkdownSource).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].stem(), "good");
    }

    #[test]
    fn test_collect_skips_unreadable_files() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "plugins/p/commands/a.md", "A");
        write(tmp.path(), "plugins/p/commands/b.md", "B");

        let mut source = MockMarkdownSource::new();
        source.expect_load().returning(|path| {
            if path.ends_with("a.md") {
                Err(ValidateError::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "denied",
                )))
            } else {
                Ok(parse_markdown_str("B body"))
            }
        });

        let files = collect_layer_files(tmp.path(), &source).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].rel_path, "plugins/p/commands/b.md");
        assert_eq!(files[0].body, "B body");
    }

    #[test]
    fn test_collect_empty_repository() {
        let tmp = TempDir::new().unwrap();
        let files = collect_layer_files(tmp.path(), &FsMarkdownSource).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_collect_ignores_directories_named_like_files() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("plugins/p/commands/dir.md")).unwrap();
        let files = collect_layer_files(tmp.path(), &FsMarkdownSource).unwrap();
        assert!(files.is_empty());
    }
}

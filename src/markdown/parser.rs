//! Markdown reader and frontmatter splitter.

use std::path::Path;

use super::types::{Frontmatter, MarkdownDocument};
use crate::error::Result;

const FRONTMATTER_DELIMITER: &str = "---";

/// Source of parsed markdown documents.
///
/// The classifier consumes documents through this trait so discovery can be
/// exercised without touching the filesystem.
#[cfg_attr(test, mockall::automock)]
pub trait MarkdownSource {
    /// Read and parse the markdown file at `path`.
    fn load(&self, path: &Path) -> Result<MarkdownDocument>;
}

/// Reads markdown from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsMarkdownSource;

impl MarkdownSource for FsMarkdownSource {
    fn load(&self, path: &Path) -> Result<MarkdownDocument> {
        parse_markdown(path)
    }
}

/// Read a markdown file and split off its frontmatter.
pub fn parse_markdown(path: &Path) -> Result<MarkdownDocument> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_markdown_str(content))
}

/// Split markdown content into frontmatter and body.
///
/// A frontmatter block exists only when the first line is `---` and a later
/// line is `---`; an unterminated block leaves the document without
/// frontmatter and with an empty body.
pub fn parse_markdown_str(content: impl Into<String>) -> MarkdownDocument {
    let content = content.into();
    let lines: Vec<&str> = content.split('\n').collect();

    let opens_block = lines
        .first()
        .is_some_and(|first| first.trim() == FRONTMATTER_DELIMITER);
    let closing = if opens_block {
        lines
            .iter()
            .skip(1)
            .position(|line| line.trim() == FRONTMATTER_DELIMITER)
            .map(|offset| offset + 1)
    } else {
        None
    };

    let (frontmatter, body) = match closing {
        Some(end) => {
            let yaml = lines[1..end].join("\n");
            (
                Some(Frontmatter::from_yaml(&yaml)),
                lines[end + 1..].join("\n"),
            )
        }
        None => (None, String::new()),
    };

    MarkdownDocument {
        content,
        frontmatter,
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_frontmatter() {
        let doc = parse_markdown_str("---\nname: test\ndescription: test description\n---\n\n# Content\n");
        let fm = doc.frontmatter.as_ref().unwrap();
        assert_eq!(fm.get_str("name"), Some("test"));
        assert_eq!(doc.body, "\n# Content\n");
        assert_eq!(doc.body_or_content(), "\n# Content\n");
    }

    #[test]
    fn test_parse_without_frontmatter() {
        let content = "# Just Content\n\nNo frontmatter here.\n";
        let doc = parse_markdown_str(content);
        assert!(doc.frontmatter.is_none());
        assert!(doc.body.is_empty());
        assert_eq!(doc.body_or_content(), content);
    }

    #[test]
    fn test_parse_empty_file() {
        let doc = parse_markdown_str("");
        assert!(doc.frontmatter.is_none());
        assert_eq!(doc.body_or_content(), "");
    }

    #[test]
    fn test_unterminated_frontmatter() {
        let doc = parse_markdown_str("---\nname: test\n# Body");
        assert!(doc.frontmatter.is_none());
        assert!(doc.body.is_empty());
    }

    #[test]
    fn test_invalid_yaml_is_kept_as_error() {
        let doc = parse_markdown_str("---\nname: [broken\n---\nbody");
        assert!(doc.has_frontmatter_error());
        assert_eq!(doc.body, "body");
    }

    #[test]
    fn test_crlf_delimiters() {
        let doc = parse_markdown_str("---\r\nname: x\r\n---\r\nbody");
        assert!(doc.frontmatter.is_some());
        assert_eq!(doc.body, "body");
    }

    #[test]
    fn test_parse_markdown_reads_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("agent.md");
        std::fs::write(&path, "---\nskills: [a, b]\n---\nBody").unwrap();

        let doc = parse_markdown(&path).unwrap();
        assert_eq!(
            doc.frontmatter.unwrap().get_string_list("skills"),
            vec!["a", "b"]
        );
        assert_eq!(doc.body, "Body");
    }

    #[test]
    fn test_parse_markdown_missing_file() {
        let temp = tempfile::tempdir().unwrap();
        assert!(parse_markdown(&temp.path().join("missing.md")).is_err());
    }
}

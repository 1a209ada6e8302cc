//! Markdown + YAML frontmatter parsing
//!
//! Plugin files are markdown documents that may open with a YAML block:
//!
//! ```text
//! ---
//! name: reviewer
//! skills: [feedback-routing]
//! ---
//! # Reviewer
//! ...
//! ```
//!
//! - **types**: `MarkdownDocument` and the lookup-only `Frontmatter` mapping
//! - **parser**: filesystem reader, frontmatter splitter and the
//!   `MarkdownSource` seam used by the architecture classifier
//!
//! # Usage
//!
//! ```rust
//! use plugin_validate::markdown::parse_markdown_str;
//!
//! let doc = parse_markdown_str("---\nskills: [a, b]\n---\nBody");
//! let fm = doc.frontmatter.unwrap();
//! assert_eq!(fm.get_string_list("skills"), vec!["a", "b"]);
//! assert_eq!(doc.body, "Body");
//! ```

mod parser;
pub mod types;

#[cfg(test)]
pub use parser::MockMarkdownSource;
pub use parser::{parse_markdown, parse_markdown_str, FsMarkdownSource, MarkdownSource};
pub use types::{Frontmatter, MarkdownDocument};

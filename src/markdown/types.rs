//! Markdown document type definitions.

use serde_yaml::{Mapping, Value};

/// A markdown file split into frontmatter and body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkdownDocument {
    /// Raw file content.
    pub content: String,
    /// Parsed frontmatter, present only when a `---` delimited block opens the file.
    pub frontmatter: Option<Frontmatter>,
    /// Text after the closing frontmatter delimiter. Empty when there is no block.
    pub body: String,
}

impl MarkdownDocument {
    /// Body text, falling back to the whole content for files without frontmatter.
    pub fn body_or_content(&self) -> &str {
        if self.body.is_empty() {
            &self.content
        } else {
            &self.body
        }
    }

    /// True when the frontmatter block exists but its YAML could not be parsed.
    pub fn has_frontmatter_error(&self) -> bool {
        self.frontmatter
            .as_ref()
            .is_some_and(|fm| fm.parse_error().is_some())
    }
}

/// Parsed YAML frontmatter.
///
/// Lookups never fail: a missing key or a value of the wrong type reads as
/// absent. When the YAML itself is invalid the mapping is empty and
/// [`Frontmatter::parse_error`] carries the parser message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frontmatter {
    values: Mapping,
    parse_error: Option<String>,
}

impl Frontmatter {
    /// Parse a YAML block (without the `---` delimiters).
    pub fn from_yaml(source: &str) -> Self {
        match serde_yaml::from_str::<Value>(source) {
            Ok(Value::Mapping(values)) => Self {
                values,
                parse_error: None,
            },
            Ok(Value::Null) => Self::default(),
            Ok(other) => Self::invalid(format!(
                "frontmatter must be a mapping, found {}",
                value_kind(&other)
            )),
            Err(e) => Self::invalid(e.to_string()),
        }
    }

    /// Frontmatter that failed to parse.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            values: Mapping::new(),
            parse_error: Some(message.into()),
        }
    }

    /// YAML parser message when the block was malformed.
    pub fn parse_error(&self) -> Option<&str> {
        self.parse_error.as_deref()
    }

    /// Raw YAML value for `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Whether `key` is present (with any value).
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// String value for `key`, `None` when absent or not a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// String items of a list value. Non-string items are dropped; a non-list
    /// value yields an empty vector.
    pub fn get_string_list(&self, key: &str) -> Vec<String> {
        match self.get(key) {
            Some(Value::Sequence(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Whether `key` holds a YAML sequence.
    pub fn is_list(&self, key: &str) -> bool {
        matches!(self.get(key), Some(Value::Sequence(_)))
    }

    /// Number of top-level keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no keys were parsed.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

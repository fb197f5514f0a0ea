//! YAML front matter parsing.
//!
//! A front-matter block is the YAML mapping enclosed by two `---` lines at
//! the very top of a document:
//!
//! ```text
//! ---
//! title: While Loops
//! sidebar_position: 3
//! license:
//!   type: CC BY-NC 4.0
//!   attribution_required: true
//! ---
//! # While Loops
//! ```
//!
//! Documents without a block are valid and carry default (empty) metadata.
//! An opening delimiter without a closing one, a block that is not YAML, and
//! a block that is YAML but not a mapping are all malformed.

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

/// Delimiter line that opens and closes a front-matter block.
const DELIMITER: &str = "---";

/// UTF-8 byte order mark, tolerated before the opening delimiter.
const BOM: char = '\u{feff}';

/// Keys with a dedicated [`FrontMatter`] field.
const KNOWN_KEYS: &[&str] = &[
    "title",
    "sidebar_position",
    "sidebar_label",
    "slug",
    "description",
    "tags",
    "author",
    "license",
    "source",
];

/// Author attribution.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Content license.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    /// License identifier (e.g., "CC BY-NC 4.0").
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Whether reuse requires attribution.
    #[serde(default)]
    pub attribution_required: bool,
}

/// Origin of the content.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Authoritative external URL the document attributes its content to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,
}

/// Metadata block of a single document.
///
/// All fields are optional. Unrecognized keys are kept in [`extra`](Self::extra)
/// so that a parsed block serializes back to equivalent key-value data.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrontMatter {
    /// Display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Sort key within the document's directory. Advisory only: siblings
    /// may share a value or leave gaps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sidebar_position: Option<f64>,

    /// Navigation label (falls back to the title).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sidebar_label: Option<String>,

    /// Overrides the URL slug derived from the file name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,

    /// Keys without a dedicated field, preserved verbatim. Keys may be any
    /// YAML scalar, not only strings.
    #[serde(flatten)]
    pub extra: Mapping,
}

/// Error returned for a malformed front-matter block.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrontMatterError {
    /// Opening `---` without a matching closing delimiter.
    #[error("front matter opened on line {line} is never closed")]
    Unterminated {
        /// Line of the opening delimiter (1-based).
        line: usize,
    },
    /// Block is not valid YAML.
    #[error("invalid YAML in front matter: {0}")]
    InvalidYaml(String),
    /// Block is valid YAML but not a key-value mapping.
    #[error("front matter must be a mapping, found {found}")]
    NotAMapping {
        /// Kind of YAML value found instead.
        found: &'static str,
    },
    /// A recognized key holds a value of the wrong type.
    #[error("invalid front matter field: {0}")]
    InvalidField(String),
    /// Serializing metadata back to YAML failed.
    #[error("failed to serialize front matter: {0}")]
    Serialize(String),
}

/// Raw document text split at the front-matter delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split<'a> {
    /// YAML between the delimiters, `None` when the document has no block.
    pub block: Option<&'a str>,
    /// Text after the closing delimiter (the full text when there is no block).
    pub body: &'a str,
    /// Line number (1-based) of the first body line in the original text.
    pub body_line: usize,
}

/// Split raw document text into front-matter block and body.
///
/// The opening delimiter must be the first line of the document. The block
/// ends at the next line consisting solely of `---`.
///
/// # Errors
///
/// Returns [`FrontMatterError::Unterminated`] when the opening delimiter has
/// no closing counterpart before end of input.
pub fn split(text: &str) -> Result<Split<'_>, FrontMatterError> {
    let no_block = Split {
        block: None,
        body: text,
        body_line: 1,
    };

    let content = text.strip_prefix(BOM).unwrap_or(text);
    let Some((first, mut offset)) = next_line(content, 0) else {
        return Ok(no_block);
    };
    if !is_delimiter(first) {
        return Ok(no_block);
    }

    let block_start = offset;
    let mut line_no = 1;
    while let Some((line, next)) = next_line(content, offset) {
        line_no += 1;
        if is_delimiter(line) {
            return Ok(Split {
                block: Some(&content[block_start..offset]),
                body: &content[next..],
                body_line: line_no + 1,
            });
        }
        offset = next;
    }

    Err(FrontMatterError::Unterminated { line: 1 })
}

/// Render metadata and body back into document text.
///
/// Empty metadata produces the body alone, without delimiters.
///
/// # Errors
///
/// Returns an error if the metadata cannot be serialized.
pub fn render(meta: &FrontMatter, body: &str) -> Result<String, FrontMatterError> {
    if meta.is_empty() {
        return Ok(body.to_owned());
    }
    let yaml = meta.to_yaml()?;
    Ok(format!("{DELIMITER}\n{yaml}{DELIMITER}\n{body}"))
}

/// Return the line starting at `start` (without its newline) and the offset
/// of the following line.
fn next_line(s: &str, start: usize) -> Option<(&str, usize)> {
    if start >= s.len() {
        return None;
    }
    match s[start..].find('\n') {
        Some(i) => Some((&s[start..start + i], start + i + 1)),
        None => Some((&s[start..], s.len())),
    }
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == DELIMITER
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

impl FrontMatter {
    /// Parse the YAML between the delimiters.
    ///
    /// An empty or comment-only block yields default metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the block is not YAML, is not a mapping, or a
    /// recognized key has the wrong type.
    pub fn from_yaml(block: &str) -> Result<Self, FrontMatterError> {
        if block.trim().is_empty() {
            return Ok(Self::default());
        }

        let value: Value = serde_yaml::from_str(block)
            .map_err(|e| FrontMatterError::InvalidYaml(e.to_string()))?;

        match value {
            Value::Null => Ok(Self::default()),
            Value::Mapping(mapping) => Self::from_mapping(mapping),
            other => Err(FrontMatterError::NotAMapping {
                found: value_kind(&other),
            }),
        }
    }

    /// Deserialize the known keys and keep everything else in `extra`.
    ///
    /// Field identifiers must be strings, so non-string keys are set aside
    /// before the typed fields are deserialized.
    fn from_mapping(mapping: Mapping) -> Result<Self, FrontMatterError> {
        let mut known = Mapping::new();
        let mut extra = Mapping::new();
        for (key, value) in mapping {
            if key.as_str().is_some_and(|k| KNOWN_KEYS.contains(&k)) {
                known.insert(key, value);
            } else {
                extra.insert(key, value);
            }
        }

        let mut meta: Self = serde_yaml::from_value(Value::Mapping(known))
            .map_err(|e| FrontMatterError::InvalidField(e.to_string()))?;
        meta.extra = extra;
        Ok(meta)
    }

    /// Parse a whole document into metadata and body.
    ///
    /// # Errors
    ///
    /// Returns an error if the document has a malformed front-matter block.
    pub fn parse(text: &str) -> Result<(Self, &str), FrontMatterError> {
        let split = split(text)?;
        let meta = match split.block {
            Some(block) => Self::from_yaml(block)?,
            None => Self::default(),
        };
        Ok((meta, split.body))
    }

    /// Serialize to YAML (without delimiters).
    ///
    /// # Errors
    ///
    /// Returns an error if a preserved extra value cannot be serialized.
    pub fn to_yaml(&self) -> Result<String, FrontMatterError> {
        serde_yaml::to_string(self).map_err(|e| FrontMatterError::Serialize(e.to_string()))
    }

    /// Check if metadata has any non-default values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Navigation label: `sidebar_label`, then `title`.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.sidebar_label.as_deref().or(self.title.as_deref())
    }

    #[must_use]
    pub fn canonical_url(&self) -> Option<&str> {
        self.source.as_ref()?.canonical_url.as_deref()
    }

    #[must_use]
    pub fn attribution_required(&self) -> bool {
        self.license.as_ref().is_some_and(|l| l.attribution_required)
    }
}

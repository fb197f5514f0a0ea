//! Category sidecar files.
//!
//! A directory may carry a small YAML (or JSON) file, by default
//! `_category_.yml`, that labels and positions the section in navigation:
//!
//! ```yaml
//! label: Iterables
//! position: 2
//! ```

use serde::{Deserialize, Serialize};

/// Section metadata loaded from a category sidecar.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryMeta {
    /// Navigation label (defaults to the title-cased directory name).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Sort key among sibling documents and categories.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Error type for category sidecar parsing.
#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    /// YAML parsing error.
    #[error("{0}")]
    Parse(String),
}

impl CategoryMeta {
    /// Parse a category sidecar.
    ///
    /// Empty content returns a default instance. JSON content is accepted as
    /// well, since JSON is a subset of YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is malformed.
    pub fn from_yaml(content: &str) -> Result<Self, CategoryError> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(trimmed).map_err(|e| CategoryError::Parse(format!("Invalid YAML: {e}")))
    }
}

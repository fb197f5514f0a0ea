//! Non-fatal build diagnostics.
//!
//! Problems found while loading a corpus never abort the build. They are
//! collected into a [`Diagnostics`] batch and reported together, the way a
//! linter reports findings.

use std::fmt;

use serde::Serialize;

/// Diagnostic severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Error => "error",
            Self::Warning => "warning",
        })
    }
}

/// What a diagnostic is about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// Front-matter block could not be parsed; metadata treated as absent.
    MalformedFrontMatter,
    /// Cross-reference target does not exist.
    BrokenLink,
    /// File could not be read.
    Unreadable,
    /// Front-matter block present but without a `title`.
    MissingTitle,
    /// Link fragment matches no heading in the target.
    MissingAnchor,
    /// Two documents map to the same route.
    DuplicateRoute,
    /// Category sidecar could not be parsed.
    InvalidCategory,
    /// `slug` climbs above the corpus root; the path-derived route is used.
    InvalidSlug,
}

impl DiagnosticKind {
    /// Stable identifier used in reports.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::MalformedFrontMatter => "malformed-front-matter",
            Self::BrokenLink => "broken-link",
            Self::Unreadable => "unreadable",
            Self::MissingTitle => "missing-title",
            Self::MissingAnchor => "missing-anchor",
            Self::DuplicateRoute => "duplicate-route",
            Self::InvalidCategory => "invalid-category",
            Self::InvalidSlug => "invalid-slug",
        }
    }

    #[must_use]
    pub fn severity(self) -> Severity {
        match self {
            Self::MalformedFrontMatter | Self::BrokenLink | Self::Unreadable => Severity::Error,
            Self::MissingTitle
            | Self::MissingAnchor
            | Self::DuplicateRoute
            | Self::InvalidCategory
            | Self::InvalidSlug => Severity::Warning,
        }
    }
}

/// A single finding attached to a corpus path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    /// Corpus path of the offending file.
    pub path: String,
    /// Line (1-based), when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub message: String,
}

impl Diagnostic {
    /// Create a diagnostic with the kind's default severity.
    #[must_use]
    pub fn new(kind: DiagnosticKind, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: kind.severity(),
            kind,
            path: path.into(),
            line: None,
            message: message.into(),
        }
    }

    /// Attach a line number.
    #[must_use]
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{line}: ", self.path)?,
            None => write!(f, "{}: ", self.path)?,
        }
        write!(
            f,
            "{}[{}]: {}",
            self.severity,
            self.kind.code(),
            self.message
        )
    }
}

/// Batch of diagnostics in deterministic order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    /// Sort by path, then line, then kind.
    pub(crate) fn sort(&mut self) {
        self.items.sort_by(|a, b| {
            a.path
                .cmp(&b.path)
                .then_with(|| a.line.cmp(&b.line))
                .then_with(|| a.kind.cmp(&b.kind))
                .then_with(|| a.message.cmp(&b.message))
        });
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    /// Diagnostics of one kind.
    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(move |d| d.kind == kind)
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.items.iter().filter(|d| d.is_error()).count()
    }

    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.items.len() - self.error_count()
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.items.iter().any(Diagnostic::is_error)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Extend<Diagnostic> for Diagnostics {
    fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

//! Parsed documents.

use std::collections::BTreeSet;

use quire_meta::{FrontMatter, FrontMatterError, split};

use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::extract::{LinkRef, extract};
use crate::path::{file_name, file_stem, parent_dir, route_for, titlecase_from_slug};

/// A single Markdown file of the corpus.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    /// Corpus path (e.g., `python/guides/lists.md`). Unique within a corpus.
    pub path: String,
    /// Site route (e.g., `/python/guides/lists`).
    pub route: String,
    /// Resolved title: front matter, then first H1, then file name.
    pub title: String,
    /// Parsed metadata; default when absent or malformed.
    pub front_matter: FrontMatter,
    /// Markdown after the front-matter block.
    pub body: String,
    /// Heading anchors available as link fragments.
    pub anchors: BTreeSet<String>,
    /// References found in the body.
    pub links: Vec<LinkRef>,
}

impl Document {
    /// Parse raw file text.
    ///
    /// Never fails: a malformed front-matter block is reported as a
    /// diagnostic and the document is kept with empty metadata.
    pub fn parse(path: impl Into<String>, text: &str) -> (Self, Vec<Diagnostic>) {
        let path = path.into();
        let mut diagnostics = Vec::new();

        let (front_matter, body, body_line, has_block) = match split(text) {
            Ok(split) => {
                let meta = match split.block.map(FrontMatter::from_yaml) {
                    Some(Ok(meta)) => meta,
                    Some(Err(e)) => {
                        diagnostics.push(malformed(&path, &e, 2));
                        FrontMatter::default()
                    }
                    None => FrontMatter::default(),
                };
                let valid_block = split.block.is_some() && diagnostics.is_empty();
                (meta, split.body, split.body_line, valid_block)
            }
            Err(e) => {
                diagnostics.push(malformed(&path, &e, 1));
                (FrontMatter::default(), text, 1, false)
            }
        };

        let extracted = extract(body, body_line);

        if has_block && front_matter.title.is_none() {
            diagnostics.push(
                Diagnostic::new(
                    DiagnosticKind::MissingTitle,
                    path.as_str(),
                    "front matter has no `title`",
                )
                .with_line(1),
            );
        }

        let title = front_matter
            .title
            .clone()
            .or(extracted.first_h1)
            .unwrap_or_else(|| fallback_title(&path));

        let route = match route_for(&path, front_matter.slug.as_deref()) {
            Some(route) => route,
            None => {
                diagnostics.push(
                    Diagnostic::new(
                        DiagnosticKind::InvalidSlug,
                        path.as_str(),
                        format!(
                            "slug `{}` climbs above the corpus root",
                            front_matter.slug.as_deref().unwrap_or_default()
                        ),
                    )
                    .with_line(1),
                );
                path_route(&path)
            }
        };

        let document = Self {
            route,
            title,
            front_matter,
            body: body.to_owned(),
            anchors: extracted.anchors,
            links: extracted.links,
            path,
        };
        (document, diagnostics)
    }

    /// Directory containing the document (`""` at the root).
    #[must_use]
    pub fn dir(&self) -> &str {
        parent_dir(&self.path)
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        file_name(&self.path)
    }

    #[must_use]
    pub fn sidebar_position(&self) -> Option<f64> {
        self.front_matter.sidebar_position
    }

    /// Navigation label: `sidebar_label`, then the resolved title.
    #[must_use]
    pub fn label(&self) -> &str {
        self.front_matter
            .sidebar_label
            .as_deref()
            .unwrap_or(&self.title)
    }

    /// Check whether `fragment` names a heading of this document.
    #[must_use]
    pub fn has_anchor(&self, fragment: &str) -> bool {
        self.anchors.contains(fragment)
    }
}

fn malformed(path: &str, error: &FrontMatterError, line: usize) -> Diagnostic {
    let line = match error {
        FrontMatterError::Unterminated { line } => *line,
        _ => line,
    };
    Diagnostic::new(DiagnosticKind::MalformedFrontMatter, path, error.to_string()).with_line(line)
}

/// Route derived from the corpus path alone.
fn path_route(path: &str) -> String {
    route_for(path, None).unwrap_or_else(|| "/".to_owned())
}

/// Title derived from the file name; `index` files use their directory.
fn fallback_title(path: &str) -> String {
    match file_stem(path) {
        "index" => match file_name(parent_dir(path)) {
            "" => "Home".to_owned(),
            dir => titlecase_from_slug(dir),
        },
        stem => titlecase_from_slug(stem),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_front_matter() {
        let text = "---\ntitle: While Loops\nsidebar_position: 4\nslug: while\n---\n# Loops\n\n[str](../../language_reference/string#isdigit)\n";
        let (doc, diags) = Document::parse("python/guides/iterables/while_loops.md", text);
        assert!(diags.is_empty());
        assert_eq!(doc.title, "While Loops");
        assert_eq!(doc.route, "/python/guides/iterables/while");
        assert_eq!(doc.sidebar_position(), Some(4.0));
        assert_eq!(doc.dir(), "python/guides/iterables");
        assert_eq!(doc.file_name(), "while_loops.md");
        assert_eq!(doc.links.len(), 1);
        assert_eq!(doc.links[0].line, 8);
        assert!(doc.has_anchor("loops"));
    }

    #[test]
    fn test_parse_without_front_matter() {
        let text = "# Strings\n\nText.\n";
        let (doc, diags) = Document::parse("python/language_reference/string.md", text);
        assert!(diags.is_empty());
        assert!(doc.front_matter.is_empty());
        assert_eq!(doc.body, text);
        assert_eq!(doc.title, "Strings");
    }

    #[test]
    fn test_unterminated_front_matter_keeps_document() {
        let text = "---\ntitle: Broken\n\n# Heading\n\n[x](./x.md)\n";
        let (doc, diags) = Document::parse("broken.md", text);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::MalformedFrontMatter);
        assert_eq!(diags[0].line, Some(1));
        assert!(doc.front_matter.is_empty());
        assert_eq!(doc.body, text);
        assert_eq!(doc.title, "Heading");
        assert_eq!(doc.links[0].line, 6);
    }

    #[test]
    fn test_invalid_yaml_treated_as_absent() {
        let text = "---\ntitle: [oops\n---\nBody\n";
        let (doc, diags) = Document::parse("guides/bad.md", text);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::MalformedFrontMatter);
        assert!(doc.front_matter.is_empty());
        assert_eq!(doc.body, "Body\n");
        assert_eq!(doc.title, "Bad");
    }

    #[test]
    fn test_missing_title_warns_and_falls_back() {
        let text = "---\nsidebar_position: 1\n---\nNo heading here.\n";
        let (doc, diags) = Document::parse("python/guides/list_comprehensions.md", text);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::MissingTitle);
        assert_eq!(doc.title, "List Comprehensions");
    }

    #[test]
    fn test_fallback_title_for_index() {
        let (doc, _) = Document::parse("python/guides/index.md", "");
        assert_eq!(doc.title, "Guides");
        assert_eq!(doc.route, "/python/guides");

        let (root, _) = Document::parse("index.md", "");
        assert_eq!(root.title, "Home");
        assert_eq!(root.route, "/");
    }

    #[test]
    fn test_slug_above_root_keeps_path_route() {
        let text = "---\ntitle: Lists\nslug: ../../../lists\n---\n";
        let (doc, diags) = Document::parse("python/guides/lists.md", text);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::InvalidSlug);
        assert!(!diags[0].is_error());
        assert_eq!(doc.route, "/python/guides/lists");
    }

    #[test]
    fn test_label_prefers_sidebar_label() {
        let text = "---\ntitle: String Methods\nsidebar_label: Strings\n---\n";
        let (doc, _) = Document::parse("string.md", text);
        assert_eq!(doc.label(), "Strings");
        assert_eq!(doc.title, "String Methods");
    }
}

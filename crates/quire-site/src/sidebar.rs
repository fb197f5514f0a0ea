//! Sidebar assembly.
//!
//! Orders the documents of a directory for navigation:
//! 1. `sidebar_position` ascending
//! 2. documents without a position after all positioned ones
//! 3. ties broken by file name, so the order is fully deterministic
//!
//! [`build_navigation`] applies the same rule to a nested tree in which each
//! subdirectory appears as a category among its sibling documents.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use quire_meta::CategoryMeta;
use serde::Serialize;

use crate::document::Document;
use crate::path::{file_name, parent_dir, titlecase_from_slug};

/// A document as shown in a sidebar.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SidebarEntry {
    /// Corpus path.
    pub path: String,
    pub file_name: String,
    /// Display label (`sidebar_label`, then title).
    pub label: String,
    pub route: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<f64>,
}

impl From<&Document> for SidebarEntry {
    fn from(doc: &Document) -> Self {
        Self {
            path: doc.path.clone(),
            file_name: doc.file_name().to_owned(),
            label: doc.label().to_owned(),
            route: doc.route.clone(),
            position: doc.sidebar_position(),
        }
    }
}

/// A directory as shown in navigation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Category {
    pub label: String,
    /// Corpus path of the directory.
    pub dir: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<f64>,
    pub items: Vec<NavItem>,
}

/// Navigation tree node.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NavItem {
    Doc(SidebarEntry),
    Category(Category),
}

impl NavItem {
    fn sort_key(&self) -> (Option<f64>, &str) {
        match self {
            Self::Doc(entry) => (entry.position, &entry.file_name),
            Self::Category(category) => (category.position, file_name(&category.dir)),
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Doc(entry) => &entry.label,
            Self::Category(category) => &category.label,
        }
    }
}

/// Sidebar ordering.
///
/// Positioned entries first (ascending, total order so `NaN` cannot break
/// sorting), then unpositioned ones; equal keys fall back to the name.
#[must_use]
pub fn compare(a_pos: Option<f64>, a_name: &str, b_pos: Option<f64>, b_name: &str) -> Ordering {
    let by_position = match (a_pos, b_pos) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_position.then_with(|| a_name.cmp(b_name))
}

/// Ordered sidebar entries for a set of sibling documents.
pub fn assemble<'a>(documents: impl IntoIterator<Item = &'a Document>) -> Vec<SidebarEntry> {
    let mut entries: Vec<SidebarEntry> = documents.into_iter().map(SidebarEntry::from).collect();
    entries.sort_by(|a, b| compare(a.position, &a.file_name, b.position, &b.file_name));
    entries
}

/// Build the navigation tree below `root` (`""` for the whole corpus).
pub fn build_navigation<'a>(
    documents: impl IntoIterator<Item = &'a Document>,
    categories: &BTreeMap<String, CategoryMeta>,
    root: &str,
) -> Vec<NavItem> {
    let mut by_dir: BTreeMap<&str, Vec<&Document>> = BTreeMap::new();
    let mut subdirs: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();

    for doc in documents {
        let dir = doc.dir();
        by_dir.entry(dir).or_default().push(doc);

        // Register every ancestor so directories holding only subdirectories appear.
        let mut child = dir;
        while !child.is_empty() {
            let parent = parent_dir(child);
            subdirs.entry(parent).or_default().insert(child);
            child = parent;
        }
    }

    let tree = NavTree {
        by_dir,
        subdirs,
        categories,
    };
    tree.items_in(root.trim_matches('/'))
}

struct NavTree<'a> {
    by_dir: BTreeMap<&'a str, Vec<&'a Document>>,
    subdirs: BTreeMap<&'a str, BTreeSet<&'a str>>,
    categories: &'a BTreeMap<String, CategoryMeta>,
}

impl NavTree<'_> {
    fn items_in(&self, dir: &str) -> Vec<NavItem> {
        let mut items: Vec<NavItem> = self
            .by_dir
            .get(dir)
            .into_iter()
            .flatten()
            .map(|doc| NavItem::Doc(SidebarEntry::from(*doc)))
            .collect();

        for child in self.subdirs.get(dir).into_iter().flatten() {
            let meta = self.categories.get(*child);
            items.push(NavItem::Category(Category {
                label: meta
                    .and_then(|m| m.label.clone())
                    .unwrap_or_else(|| titlecase_from_slug(file_name(child))),
                dir: (*child).to_owned(),
                position: meta.and_then(|m| m.position),
                items: self.items_in(child),
            }));
        }

        items.sort_by(|a, b| {
            let (a_pos, a_name) = a.sort_key();
            let (b_pos, b_name) = b.sort_key();
            compare(a_pos, a_name, b_pos, b_name)
        });
        items
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn doc(path: &str, position: Option<f64>) -> Document {
        let text = match position {
            Some(p) => format!("---\ntitle: {path}\nsidebar_position: {p}\n---\n"),
            None => format!("---\ntitle: {path}\n---\n"),
        };
        Document::parse(path, &text).0
    }

    fn names(entries: &[SidebarEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.file_name.as_str()).collect()
    }

    #[test]
    fn test_assemble_positioned_then_absent() {
        let docs = [
            doc("s/b.md", Some(2.0)),
            doc("s/a.md", Some(1.0)),
            doc("s/c.md", None),
        ];
        let entries = assemble(&docs);
        assert_eq!(names(&entries), vec!["a.md", "b.md", "c.md"]);
    }

    #[test]
    fn test_assemble_ties_break_by_file_name() {
        let docs = [
            doc("s/zeta.md", Some(1.0)),
            doc("s/alpha.md", Some(1.0)),
            doc("s/omega.md", None),
            doc("s/beta.md", None),
        ];
        let entries = assemble(&docs);
        assert_eq!(
            names(&entries),
            vec!["alpha.md", "zeta.md", "beta.md", "omega.md"]
        );
    }

    #[test]
    fn test_assemble_gaps_and_fractions() {
        let docs = [
            doc("s/x.md", Some(10.0)),
            doc("s/y.md", Some(1.5)),
            doc("s/z.md", Some(-1.0)),
        ];
        let entries = assemble(&docs);
        assert_eq!(names(&entries), vec!["z.md", "y.md", "x.md"]);
    }

    #[test]
    fn test_assemble_is_deterministic() {
        let docs = [
            doc("s/d.md", None),
            doc("s/c.md", Some(1.0)),
            doc("s/b.md", Some(1.0)),
            doc("s/a.md", None),
        ];
        let mut reversed = docs.clone();
        reversed.reverse();
        assert_eq!(assemble(&docs), assemble(&reversed));
    }

    #[test]
    fn test_navigation_nests_categories() {
        let docs = [
            doc("python/index.md", Some(1.0)),
            doc("python/guides/lists.md", Some(2.0)),
            doc("python/guides/strings.md", Some(1.0)),
            doc("python/language_reference/string.md", None),
        ];
        let mut categories = BTreeMap::new();
        categories.insert(
            "python/guides".to_owned(),
            CategoryMeta {
                label: Some("Guides".to_owned()),
                position: Some(2.0),
                description: None,
            },
        );

        let nav = build_navigation(&docs, &categories, "");
        assert_eq!(nav.len(), 1);
        let NavItem::Category(python) = &nav[0] else {
            panic!("expected category");
        };
        assert_eq!(python.label, "Python");

        let labels: Vec<_> = python.items.iter().map(NavItem::label).collect();
        assert_eq!(
            labels,
            vec!["python/index.md", "Guides", "Language Reference"]
        );

        let NavItem::Category(guides) = &python.items[1] else {
            panic!("expected category");
        };
        let labels: Vec<_> = guides.items.iter().map(NavItem::label).collect();
        assert_eq!(
            labels,
            vec!["python/guides/strings.md", "python/guides/lists.md"]
        );
    }

    #[test]
    fn test_navigation_scoped_to_section() {
        let docs = [
            doc("python/guides/lists.md", None),
            doc("javascript/array.md", None),
        ];
        let nav = build_navigation(&docs, &BTreeMap::new(), "python");
        assert_eq!(nav.len(), 1);
        assert_eq!(nav[0].label(), "Guides");

        assert!(build_navigation(&docs, &BTreeMap::new(), "rust").is_empty());
    }

    #[test]
    fn test_nav_item_serializes_with_type_tag() {
        let docs = [doc("a.md", Some(1.0))];
        let nav = build_navigation(&docs, &BTreeMap::new(), "");
        let json = serde_json::to_value(&nav).unwrap();
        assert_eq!(json[0]["type"], "doc");
        assert_eq!(json[0]["route"], "/a");
        assert_eq!(json[0]["position"], 1.0);
    }
}

//! Cross-reference resolution.
//!
//! Resolves link destinations written in a document to corpus paths:
//! - `./lists` from `python/guides/strings.md` → `python/guides/lists.md`
//! - `../../language_reference/string#isdigit` from
//!   `python/guides/iterables/while_loops.md` → `python/language_reference/string.md#isdigit`
//! - `/python/guides/lists` → the document whose route is `/python/guides/lists`
//!
//! External links (`https:`, `mailto:`, protocol-relative `//`) are skipped.
//! Fragments are preserved unchanged.

use std::borrow::Cow;
use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;

use crate::path::{extension, join, normalize, parent_dir};
use crate::registry::Registry;

/// URI scheme prefix (`https:`, `mailto:`, `tel:`, ...).
static SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").unwrap());

/// Classified link destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkTarget<'a> {
    /// Points outside the corpus.
    External,
    /// Fragment-only link into the referring document.
    SameDocument { fragment: Option<&'a str> },
    /// Path inside the corpus, possibly with a fragment.
    Local {
        path: &'a str,
        fragment: Option<&'a str>,
    },
}

/// Classify a raw link destination.
#[must_use]
pub fn classify(dest: &str) -> LinkTarget<'_> {
    let dest = dest.trim();
    if dest.starts_with("//") || SCHEME.is_match(dest) {
        return LinkTarget::External;
    }

    let (before, fragment) = match dest.split_once('#') {
        Some((before, fragment)) => (before, Some(fragment)),
        None => (dest, None),
    };
    let path = before.split_once('?').map_or(before, |(path, _)| path);

    if path.is_empty() {
        LinkTarget::SameDocument { fragment }
    } else {
        LinkTarget::Local { path, fragment }
    }
}

/// A successfully resolved reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedLink {
    /// Corpus path of the target document or asset.
    pub target: String,
    /// Fragment without `#`, unchanged from the source.
    pub fragment: Option<String>,
    /// Target is a non-document file (image, PDF, ...).
    pub is_asset: bool,
}

/// Error returned when a local link cannot be resolved.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LinkError {
    /// The path climbs above the corpus root.
    #[error("link `{link}` points outside the documentation root")]
    EscapesRoot { link: String },
    /// Nothing exists at the resolved location.
    #[error("link `{link}` is broken: nothing found at `{resolved}`")]
    NotFound { link: String, resolved: String },
}

/// Resolves links against a complete [`Registry`].
pub struct Resolver<'a> {
    registry: &'a Registry,
    extensions: &'a [String],
    check_assets: bool,
}

impl<'a> Resolver<'a> {
    /// Create a resolver.
    ///
    /// `extensions` are content-file extensions without dots, in lookup order.
    #[must_use]
    pub fn new(registry: &'a Registry, extensions: &'a [String], check_assets: bool) -> Self {
        Self {
            registry,
            extensions,
            check_assets,
        }
    }

    /// Resolve `dest` as written in the document at corpus path `from`.
    ///
    /// Returns `Ok(None)` for external links.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError`] when the target cannot be found.
    pub fn resolve(&self, from: &str, dest: &str) -> Result<Option<ResolvedLink>, LinkError> {
        let (path, fragment) = match classify(dest) {
            LinkTarget::External => return Ok(None),
            LinkTarget::SameDocument { fragment } => {
                return Ok(Some(ResolvedLink {
                    target: from.to_owned(),
                    fragment: fragment.map(ToOwned::to_owned),
                    is_asset: false,
                }));
            }
            LinkTarget::Local { path, fragment } => (path, fragment),
        };

        let decoded = percent_decode_str(path).decode_utf8_lossy();
        let (absolute, joined) = match decoded.strip_prefix('/') {
            Some(rooted) => (true, normalize("", rooted)),
            None => (false, normalize(parent_dir(from), &decoded)),
        };
        let joined = joined.ok_or_else(|| LinkError::EscapesRoot {
            link: dest.to_owned(),
        })?;

        // File paths win over routes: an absolute link is only looked up as a
        // slug route when no document lives at that path.
        let found = self
            .lookup_document(&joined)
            .map(|target| (target, false))
            .or_else(|| {
                absolute
                    .then(|| self.registry.by_route(&decoded))
                    .flatten()
                    .map(|doc| (doc.path.clone(), false))
            })
            .or_else(|| self.lookup_asset(&joined).map(|target| (target, true)));

        match found {
            Some((target, is_asset)) => Ok(Some(ResolvedLink {
                target,
                fragment: fragment.map(ToOwned::to_owned),
                is_asset,
            })),
            None => Err(LinkError::NotFound {
                link: dest.to_owned(),
                resolved: display_path(&joined),
            }),
        }
    }

    /// Find a document for a normalized path.
    ///
    /// Tries the path itself when it has a content extension, then each
    /// extension appended, then a directory index.
    fn lookup_document(&self, joined: &str) -> Option<String> {
        if joined.is_empty() {
            return self.index_in("");
        }
        if self.is_content(joined) && self.registry.contains(joined) {
            return Some(joined.to_owned());
        }
        self.extensions
            .iter()
            .map(|ext| format!("{joined}.{ext}"))
            .find(|candidate| self.registry.contains(candidate))
            .or_else(|| self.index_in(joined))
    }

    fn index_in(&self, dir: &str) -> Option<String> {
        self.extensions
            .iter()
            .map(|ext| join(dir, &format!("index.{ext}")))
            .find(|candidate| self.registry.contains(candidate))
    }

    /// Non-content files are assets; unchecked assets always resolve.
    fn lookup_asset(&self, joined: &str) -> Option<String> {
        if extension(joined).is_none() || self.is_content(joined) {
            return None;
        }
        (!self.check_assets || self.registry.has_asset(joined)).then(|| joined.to_owned())
    }

    fn is_content(&self, path: &str) -> bool {
        extension(path).is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }
}

fn display_path(joined: &str) -> String {
    match joined {
        "" => "/".to_owned(),
        other => other.to_owned(),
    }
}

/// Percent-decoded fragment, for comparison with heading anchors.
pub(crate) fn decode_fragment(fragment: &str) -> Cow<'_, str> {
    percent_decode_str(fragment).decode_utf8_lossy()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::document::Document;

    fn registry(paths: &[&str], assets: &[&str]) -> Registry {
        let docs = paths.iter().map(|p| Document::parse(*p, "").0);
        let assets = assets.iter().map(|a| (*a).to_owned()).collect::<BTreeSet<_>>();
        Registry::new(docs, assets).0
    }

    fn extensions() -> Vec<String> {
        vec!["md".to_owned(), "mdx".to_owned()]
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("https://python.org"), LinkTarget::External);
        assert_eq!(classify("mailto:a@b.c"), LinkTarget::External);
        assert_eq!(classify("//cdn.example.com/x.js"), LinkTarget::External);
        assert_eq!(
            classify("#slicing"),
            LinkTarget::SameDocument {
                fragment: Some("slicing")
            }
        );
        assert_eq!(
            classify("./lists?tab=py#append"),
            LinkTarget::Local {
                path: "./lists",
                fragment: Some("append")
            }
        );
        assert_eq!(
            classify("lists.md"),
            LinkTarget::Local {
                path: "lists.md",
                fragment: None
            }
        );
    }

    #[test]
    fn test_resolve_parent_traversal_with_fragment() {
        let reg = registry(
            &[
                "python/guides/iterables/while_loops.md",
                "python/language_reference/string.md",
            ],
            &[],
        );
        let exts = extensions();
        let resolver = Resolver::new(&reg, &exts, true);
        let resolved = resolver
            .resolve(
                "python/guides/iterables/while_loops.md",
                "../../language_reference/string#isdigit",
            )
            .unwrap()
            .unwrap();
        assert_eq!(resolved.target, "python/language_reference/string.md");
        assert_eq!(resolved.fragment.as_deref(), Some("isdigit"));
        assert!(!resolved.is_asset);
    }

    #[test]
    fn test_resolve_sibling_with_and_without_extension() {
        let reg = registry(&["python/guides/lists.md", "python/guides/sets.mdx"], &[]);
        let exts = extensions();
        let resolver = Resolver::new(&reg, &exts, true);
        let from = "python/guides/lists.md";

        let target = |dest| resolver.resolve(from, dest).unwrap().unwrap().target;
        assert_eq!(target("./sets"), "python/guides/sets.mdx");
        assert_eq!(target("sets.mdx"), "python/guides/sets.mdx");
        assert_eq!(target("./lists.md"), "python/guides/lists.md");
    }

    #[test]
    fn test_resolve_directory_index() {
        let reg = registry(&["python/guides/index.md", "python/overview.md"], &[]);
        let exts = extensions();
        let resolver = Resolver::new(&reg, &exts, true);
        let resolved = resolver
            .resolve("python/overview.md", "./guides/")
            .unwrap()
            .unwrap();
        assert_eq!(resolved.target, "python/guides/index.md");
    }

    #[test]
    fn test_resolve_absolute_path_and_route() {
        let reg = registry(
            &[
                "javascript/array.md",
                "python/guides/lists.md",
            ],
            &[],
        );
        let exts = extensions();
        let resolver = Resolver::new(&reg, &exts, true);
        let from = "python/guides/lists.md";
        let target = |dest| resolver.resolve(from, dest).unwrap().unwrap().target;
        assert_eq!(target("/javascript/array.md"), "javascript/array.md");
        assert_eq!(target("/javascript/array"), "javascript/array.md");
    }

    #[test]
    fn test_resolve_slug_route() {
        let docs = [Document::parse("python/guides/lists.md", "---\ntitle: L\nslug: /lists\n---\n").0];
        let reg = Registry::new(docs, BTreeSet::new()).0;
        let exts = extensions();
        let resolver = Resolver::new(&reg, &exts, true);
        let resolved = resolver.resolve("index.md", "/lists#append").unwrap().unwrap();
        assert_eq!(resolved.target, "python/guides/lists.md");
        assert_eq!(resolved.fragment.as_deref(), Some("append"));
    }

    #[test]
    fn test_resolve_file_path_before_slug_route() {
        let docs = [
            Document::parse("guides/lists.md", "---\ntitle: L\nslug: /lists\n---\n").0,
            Document::parse("python/arrays.md", "---\ntitle: A\nslug: /guides/lists\n---\n").0,
        ];
        let reg = Registry::new(docs, BTreeSet::new()).0;
        let exts = extensions();
        let resolver = Resolver::new(&reg, &exts, true);
        let resolved = resolver.resolve("index.md", "/guides/lists").unwrap().unwrap();
        assert_eq!(resolved.target, "guides/lists.md");
    }

    #[test]
    fn test_resolve_percent_encoded() {
        let reg = registry(&["guides/my page.md"], &[]);
        let exts = extensions();
        let resolver = Resolver::new(&reg, &exts, true);
        let resolved = resolver.resolve("guides/a.md", "my%20page.md").unwrap().unwrap();
        assert_eq!(resolved.target, "guides/my page.md");
    }

    #[test]
    fn test_resolve_same_document_fragment() {
        let reg = registry(&["a.md"], &[]);
        let exts = extensions();
        let resolver = Resolver::new(&reg, &exts, true);
        let resolved = resolver.resolve("a.md", "#usage").unwrap().unwrap();
        assert_eq!(resolved.target, "a.md");
        assert_eq!(resolved.fragment.as_deref(), Some("usage"));
    }

    #[test]
    fn test_resolve_external_is_skipped() {
        let reg = registry(&[], &[]);
        let exts = extensions();
        let resolver = Resolver::new(&reg, &exts, true);
        assert_eq!(resolver.resolve("a.md", "https://docs.python.org").unwrap(), None);
    }

    #[test]
    fn test_resolve_broken() {
        let reg = registry(&["python/guides/lists.md"], &[]);
        let exts = extensions();
        let resolver = Resolver::new(&reg, &exts, true);
        let err = resolver
            .resolve("python/guides/lists.md", "./tuples#packing")
            .unwrap_err();
        assert_eq!(
            err,
            LinkError::NotFound {
                link: "./tuples#packing".to_owned(),
                resolved: "python/guides/tuples".to_owned(),
            }
        );
    }

    #[test]
    fn test_resolve_escaping_root() {
        let reg = registry(&["a.md"], &[]);
        let exts = extensions();
        let resolver = Resolver::new(&reg, &exts, true);
        assert!(matches!(
            resolver.resolve("a.md", "../outside.md"),
            Err(LinkError::EscapesRoot { .. })
        ));
    }

    #[test]
    fn test_resolve_assets() {
        let reg = registry(&["guides/loops.md"], &["guides/img/loop.png"]);
        let exts = extensions();

        let checking = Resolver::new(&reg, &exts, true);
        let resolved = checking
            .resolve("guides/loops.md", "img/loop.png")
            .unwrap()
            .unwrap();
        assert!(resolved.is_asset);
        assert!(checking.resolve("guides/loops.md", "img/missing.png").is_err());

        let lenient = Resolver::new(&reg, &exts, false);
        assert!(lenient.resolve("guides/loops.md", "img/missing.png").is_ok());
    }

    #[test]
    fn test_decode_fragment() {
        assert_eq!(decode_fragment("caf%C3%A9"), "café");
        assert_eq!(decode_fragment("plain"), "plain");
    }
}

//! Corpus loading.
//!
//! A build runs in two phases with the [`Registry`] as the barrier between
//! them:
//!
//! 1. every document is read and parsed in parallel (front matter, headings,
//!    links);
//! 2. once the registry is complete, every document's links are resolved in
//!    parallel against it.
//!
//! Neither phase shares mutable state; per-document results are collected
//! and the diagnostics sorted afterwards, so the output does not depend on
//! scheduling.
//!
//! # Example
//!
//! ```ignore
//! use quire_site::{Corpus, CorpusConfig};
//!
//! let config = CorpusConfig::new("docs");
//! let corpus = Corpus::load(&config)?;
//! for diagnostic in corpus.diagnostics() {
//!     eprintln!("{diagnostic}");
//! }
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use glob::Pattern;
use quire_meta::CategoryMeta;
use rayon::prelude::*;

use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::document::Document;
use crate::links::{LinkError, ResolvedLink, Resolver, decode_fragment};
use crate::path::{extension, file_name, parent_dir};
use crate::registry::Registry;
use crate::scanner::{Scanner, SourceFile};
use crate::sidebar::{NavItem, SidebarEntry, assemble, build_navigation};

/// Convert Duration to milliseconds as f64.
fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Configuration for [`Corpus::load`].
#[derive(Clone, Debug)]
pub struct CorpusConfig {
    /// Root directory containing Markdown sources.
    pub source_dir: PathBuf,
    /// Content-file extensions without dots, in lookup order.
    pub extensions: Vec<String>,
    /// Glob patterns (relative to `source_dir`) of entries to skip.
    pub exclude: Vec<String>,
    /// File names recognized as category sidecars.
    pub category_files: Vec<String>,
    /// Report link fragments that match no heading.
    pub check_anchors: bool,
    /// Require non-document link targets to exist.
    pub check_assets: bool,
}

impl CorpusConfig {
    /// Default configuration for a source directory.
    #[must_use]
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            ..Self::default()
        }
    }
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("docs"),
            extensions: vec!["md".to_owned(), "mdx".to_owned()],
            exclude: Vec::new(),
            category_files: vec!["_category_.yml".to_owned(), "_category_.json".to_owned()],
            check_anchors: false,
            check_assets: true,
        }
    }
}

/// Error that aborts a corpus load.
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    /// Source directory is missing or not a directory.
    #[error("Source directory not found: {}", .0.display())]
    SourceNotFound(PathBuf),
    /// An exclude pattern is not a valid glob.
    #[error("Invalid exclude pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

/// A fully loaded and checked documentation corpus.
#[derive(Debug)]
pub struct Corpus {
    config: CorpusConfig,
    registry: Registry,
    /// Category sidecars keyed by directory.
    categories: BTreeMap<String, CategoryMeta>,
    diagnostics: Diagnostics,
    link_count: usize,
}

impl Corpus {
    /// Scan, parse and check the corpus under `config.source_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError`] when the source directory is missing or an
    /// exclude pattern is invalid. Problems with individual files are
    /// reported as diagnostics instead.
    pub fn load(config: &CorpusConfig) -> Result<Self, CorpusError> {
        let start = Instant::now();
        if !config.source_dir.is_dir() {
            return Err(CorpusError::SourceNotFound(config.source_dir.clone()));
        }

        let exclude = config
            .exclude
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|source| CorpusError::Pattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let scan = Scanner::new(
            config.source_dir.clone(),
            config.extensions.clone(),
            config.category_files.clone(),
            exclude,
        )
        .scan();

        let mut diagnostics = Diagnostics::new();
        let read: Vec<Result<(String, String), Diagnostic>> = scan
            .documents
            .par_iter()
            .map(|source| read_source(source).map(|text| (source.path.clone(), text)))
            .collect();
        let mut sources = Vec::with_capacity(read.len());
        for result in read {
            match result {
                Ok(source) => sources.push(source),
                Err(d) => diagnostics.push(d),
            }
        }

        let mut categories = Vec::with_capacity(scan.categories.len());
        for source in &scan.categories {
            match read_source(source) {
                Ok(content) => categories.push((source.path.clone(), content)),
                Err(d) => diagnostics.push(d),
            }
        }

        let corpus = Self::build(
            config.clone(),
            sources,
            categories,
            scan.assets,
            diagnostics,
        );
        tracing::info!(
            source_dir = %config.source_dir.display(),
            documents = corpus.registry.len(),
            links = corpus.link_count,
            errors = corpus.diagnostics.error_count(),
            warnings = corpus.diagnostics.warning_count(),
            elapsed_ms = elapsed_ms(start),
            "Corpus loaded"
        );
        Ok(corpus)
    }

    /// Build a corpus from in-memory `(path, content)` pairs.
    ///
    /// Paths are classified like scanned files: content extensions become
    /// documents, category file names become sidecars, anything else is an
    /// asset. `config.source_dir` and `config.exclude` are ignored.
    #[must_use]
    pub fn from_sources<P, C>(
        config: &CorpusConfig,
        sources: impl IntoIterator<Item = (P, C)>,
    ) -> Self
    where
        P: Into<String>,
        C: Into<String>,
    {
        let mut documents = Vec::new();
        let mut categories = Vec::new();
        let mut assets = BTreeSet::new();
        for (path, content) in sources {
            let path = path.into();
            let name = file_name(&path);
            if config.category_files.iter().any(|c| c == name) {
                categories.push((path, content.into()));
            } else if is_content(&config.extensions, &path) {
                if !name.starts_with('_') {
                    documents.push((path, content.into()));
                }
            } else {
                assets.insert(path);
            }
        }
        Self::build(config.clone(), documents, categories, assets, Diagnostics::new())
    }

    fn build(
        config: CorpusConfig,
        sources: Vec<(String, String)>,
        category_sources: Vec<(String, String)>,
        assets: BTreeSet<String>,
        mut diagnostics: Diagnostics,
    ) -> Self {
        // Phase 1: parse.
        let parsed: Vec<(Document, Vec<Diagnostic>)> = sources
            .par_iter()
            .map(|(path, text)| {
                let parsed = Document::parse(path.as_str(), text);
                tracing::debug!(
                    path = %path,
                    links = parsed.0.links.len(),
                    anchors = parsed.0.anchors.len(),
                    "Parsed document"
                );
                parsed
            })
            .collect();

        let mut documents = Vec::with_capacity(parsed.len());
        for (document, found) in parsed {
            documents.push(document);
            diagnostics.extend(found);
        }

        let categories = load_categories(category_sources, &mut diagnostics);

        let (registry, duplicates) = Registry::new(documents, assets);
        diagnostics.extend(duplicates);

        // Phase 2: resolve links against the complete registry.
        let resolver = Resolver::new(&registry, &config.extensions, config.check_assets);
        let checked: Vec<(usize, Vec<Diagnostic>)> = registry
            .documents
            .par_iter()
            .map(|(_, document)| check_links(&resolver, &registry, document, config.check_anchors))
            .collect();

        let mut link_count = 0;
        for (count, found) in checked {
            link_count += count;
            diagnostics.extend(found);
        }
        diagnostics.sort();

        Self {
            config,
            registry,
            categories,
            diagnostics,
            link_count,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    #[must_use]
    pub fn document(&self, path: &str) -> Option<&Document> {
        self.registry.get(path)
    }

    /// All findings of the build, sorted by path, line and kind.
    #[must_use]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Number of local links checked (external links excluded).
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.link_count
    }

    /// Top-level directories holding documents (e.g., `javascript`, `python`).
    #[must_use]
    pub fn sections(&self) -> Vec<&str> {
        let mut sections: Vec<&str> = self
            .registry
            .documents()
            .filter_map(|doc| doc.path.split_once('/').map(|(first, _)| first))
            .collect();
        sections.dedup();
        sections
    }

    /// Ordered documents directly inside `dir`.
    #[must_use]
    pub fn sidebar(&self, dir: &str) -> Vec<SidebarEntry> {
        assemble(self.registry.documents_in(dir.trim_matches('/')))
    }

    /// Navigation tree below `section` (`""` for the whole corpus).
    #[must_use]
    pub fn navigation(&self, section: &str) -> Vec<NavItem> {
        build_navigation(self.registry.documents(), &self.categories, section)
    }

    /// Category sidecar of `dir`, if one was loaded.
    #[must_use]
    pub fn category(&self, dir: &str) -> Option<&CategoryMeta> {
        self.categories.get(dir)
    }

    /// Resolve a link as written in the document at `from`.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError`] when the target does not exist.
    pub fn resolve(&self, from: &str, dest: &str) -> Result<Option<ResolvedLink>, LinkError> {
        Resolver::new(&self.registry, &self.config.extensions, self.config.check_assets)
            .resolve(from, dest)
    }
}

fn read_source(source: &SourceFile) -> Result<String, Diagnostic> {
    fs::read_to_string(&source.fs_path).map_err(|e| {
        tracing::warn!(path = %source.path, error = %e, "Failed to read file");
        Diagnostic::new(
            DiagnosticKind::Unreadable,
            source.path.as_str(),
            format!("cannot read file: {e}"),
        )
    })
}

fn is_content(extensions: &[String], path: &str) -> bool {
    extension(path).is_some_and(|ext| extensions.iter().any(|e| e == ext))
}

/// Parse sidecars, keyed by directory. The first sidecar of a directory wins.
fn load_categories(
    sources: Vec<(String, String)>,
    diagnostics: &mut Diagnostics,
) -> BTreeMap<String, CategoryMeta> {
    let mut categories = BTreeMap::new();
    for (path, content) in sources {
        match CategoryMeta::from_yaml(&content) {
            Ok(meta) => {
                categories
                    .entry(parent_dir(&path).to_owned())
                    .or_insert(meta);
            }
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Failed to parse category, skipping");
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::InvalidCategory,
                    path.as_str(),
                    e.to_string(),
                ));
            }
        }
    }
    categories
}

/// Resolve every link of `document`, returning the number of local links
/// and the problems found.
fn check_links(
    resolver: &Resolver<'_>,
    registry: &Registry,
    document: &Document,
    check_anchors: bool,
) -> (usize, Vec<Diagnostic>) {
    let mut count = 0;
    let mut diagnostics = Vec::new();

    for link in &document.links {
        match resolver.resolve(&document.path, &link.dest) {
            Ok(None) => {}
            Ok(Some(resolved)) => {
                count += 1;
                if !check_anchors || resolved.is_asset {
                    continue;
                }
                let Some(fragment) = resolved.fragment.as_deref().filter(|f| !f.is_empty()) else {
                    continue;
                };
                let Some(target) = registry.get(&resolved.target) else {
                    continue;
                };
                if !target.has_anchor(&decode_fragment(fragment)) {
                    diagnostics.push(
                        Diagnostic::new(
                            DiagnosticKind::MissingAnchor,
                            document.path.as_str(),
                            format!("`{}` has no heading `#{fragment}`", target.path),
                        )
                        .with_line(link.line),
                    );
                }
            }
            Err(e) => {
                count += 1;
                diagnostics.push(
                    Diagnostic::new(DiagnosticKind::BrokenLink, document.path.as_str(), e.to_string())
                        .with_line(link.line),
                );
            }
        }
    }

    (count, diagnostics)
}

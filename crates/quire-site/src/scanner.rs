//! Source discovery by filesystem walking.
//!
//! This module separates the discovery phase (finding files) from the
//! parsing phase. The Scanner only classifies files, returning lightweight
//! references for the corpus loader to read.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use glob::Pattern;
use ignore::WalkBuilder;

/// Reference to a file found during the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SourceFile {
    /// Corpus path (e.g., `python/guides/lists.md`).
    pub path: String,
    /// Location on disk.
    pub fs_path: PathBuf,
}

/// Classified scan output.
#[derive(Debug, Default)]
pub(crate) struct ScanResult {
    /// Content files (Markdown).
    pub documents: Vec<SourceFile>,
    /// Category sidecar files.
    pub categories: Vec<SourceFile>,
    /// Corpus paths of every other file.
    pub assets: BTreeSet<String>,
}

/// Discovers content files, category sidecars and assets.
///
/// Hidden entries (leading `.`) are skipped, as are entries matching an
/// exclude pattern. Content files starting with `_` are partials and not
/// documents.
pub(crate) struct Scanner {
    source_dir: PathBuf,
    extensions: Vec<String>,
    category_files: Vec<String>,
    exclude: Vec<Pattern>,
}

impl Scanner {
    pub fn new(
        source_dir: PathBuf,
        extensions: Vec<String>,
        category_files: Vec<String>,
        exclude: Vec<Pattern>,
    ) -> Self {
        Self {
            source_dir,
            extensions,
            category_files,
            exclude,
        }
    }

    /// Walk the source directory.
    ///
    /// Unreadable entries are logged and skipped.
    pub fn scan(&self) -> ScanResult {
        let mut result = ScanResult::default();

        let root = self.source_dir.clone();
        let exclude = self.exclude.clone();
        let walker = WalkBuilder::new(&self.source_dir)
            .standard_filters(false)
            .hidden(true)
            .sort_by_file_name(std::cmp::Ord::cmp)
            .filter_entry(move |entry| {
                corpus_path(&root, entry.path())
                    .is_none_or(|rel| rel.is_empty() || !exclude.iter().any(|p| p.matches(&rel)))
            })
            .build();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let Some(path) = corpus_path(&self.source_dir, entry.path()) else {
                continue;
            };
            let name = crate::path::file_name(&path);
            let source = SourceFile {
                fs_path: entry.into_path(),
                path: path.clone(),
            };

            if self.category_files.iter().any(|c| c == name) {
                result.categories.push(source);
            } else if self.is_content(name) {
                if !name.starts_with('_') {
                    result.documents.push(source);
                }
            } else {
                result.assets.insert(path);
            }
        }

        tracing::debug!(
            documents = result.documents.len(),
            categories = result.categories.len(),
            assets = result.assets.len(),
            "Scanned source directory"
        );
        result
    }

    fn is_content(&self, name: &str) -> bool {
        crate::path::extension(name).is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }
}

/// Corpus path of `path` below `root`, with `/` separators.
fn corpus_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let segments: Vec<_> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    Some(segments.join("/"))
}

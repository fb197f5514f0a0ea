//! Document registry keyed by corpus path.
//!
//! The registry is the barrier between the two build phases: every document
//! is parsed first, then links are resolved against the complete registry.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::document::Document;

/// All documents and assets of a corpus.
#[derive(Debug, Default)]
pub struct Registry {
    pub(crate) documents: BTreeMap<String, Document>,
    assets: BTreeSet<String>,
    /// Route to corpus path (first claimant wins).
    routes: HashMap<String, String>,
}

impl Registry {
    /// Build a registry, reporting documents whose route is already taken.
    pub(crate) fn new(
        documents: impl IntoIterator<Item = Document>,
        assets: BTreeSet<String>,
    ) -> (Self, Vec<Diagnostic>) {
        let documents: BTreeMap<String, Document> = documents
            .into_iter()
            .map(|doc| (doc.path.clone(), doc))
            .collect();

        let mut routes = HashMap::with_capacity(documents.len());
        let mut diagnostics = Vec::new();
        for doc in documents.values() {
            if let Some(owner) = routes.get(&doc.route) {
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::DuplicateRoute,
                    doc.path.as_str(),
                    format!("route `{}` is already used by `{owner}`", doc.route),
                ));
            } else {
                routes.insert(doc.route.clone(), doc.path.clone());
            }
        }

        let registry = Self {
            documents,
            assets,
            routes,
        };
        (registry, diagnostics)
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Document> {
        self.documents.get(path)
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.documents.contains_key(path)
    }

    /// Look up a document by its site route (e.g., `/python/guides/lists`).
    #[must_use]
    pub fn by_route(&self, route: &str) -> Option<&Document> {
        let route = match route.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        self.routes.get(route).and_then(|path| self.get(path))
    }

    #[must_use]
    pub fn has_asset(&self, path: &str) -> bool {
        self.assets.contains(path)
    }

    /// Documents in corpus-path order.
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    /// Documents directly inside `dir`.
    pub fn documents_in<'a>(&'a self, dir: &'a str) -> impl Iterator<Item = &'a Document> {
        self.documents.values().filter(move |doc| doc.dir() == dir)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

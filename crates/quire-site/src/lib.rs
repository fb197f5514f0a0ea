//! Documentation corpus for quire.
//!
//! This crate loads a directory of Markdown documents and provides:
//! - [`Corpus`]: two-phase build (parse everything, then resolve links)
//! - [`Resolver`]: cross-reference resolution against a [`Registry`]
//! - [`assemble`] / [`build_navigation`]: sidebar ordering by
//!   `sidebar_position`, then file name
//! - [`Diagnostics`]: non-fatal findings of a build
//!
//! # Quick Start
//!
//! ```
//! use quire_site::{Corpus, CorpusConfig};
//!
//! let corpus = Corpus::from_sources(
//!     &CorpusConfig::default(),
//!     [
//!         ("python/lists.md", "---\ntitle: Lists\nsidebar_position: 2\n---\n[str](./strings)\n"),
//!         ("python/strings.md", "---\ntitle: Strings\nsidebar_position: 1\n---\n"),
//!     ],
//! );
//! assert!(corpus.diagnostics().is_empty());
//!
//! let labels: Vec<_> = corpus.sidebar("python").into_iter().map(|e| e.label).collect();
//! assert_eq!(labels, ["Strings", "Lists"]);
//! ```

mod corpus;
mod diagnostics;
mod document;
mod extract;
mod headings;
mod links;
pub mod path;
mod registry;
mod scanner;
mod sidebar;

pub use corpus::{Corpus, CorpusConfig, CorpusError};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Severity};
pub use document::Document;
pub use extract::{LinkKind, LinkRef};
pub use headings::slugify;
pub use links::{LinkError, LinkTarget, ResolvedLink, Resolver, classify};
pub use registry::Registry;
pub use sidebar::{Category, NavItem, SidebarEntry, assemble, build_navigation, compare};

//! Document metadata for quire.
//!
//! This crate provides:
//! - [`FrontMatter`]: the YAML block at the top of a Markdown document
//! - [`split`]: pure delimiter splitting of raw document text
//! - [`CategoryMeta`]: optional per-directory sidecar labelling a section
//!
//! # Quick Start
//!
//! ```
//! use quire_meta::FrontMatter;
//!
//! let text = "---\ntitle: Lists\nsidebar_position: 2\n---\n# Lists\n";
//! let (meta, body) = FrontMatter::parse(text).unwrap();
//! assert_eq!(meta.title.as_deref(), Some("Lists"));
//! assert_eq!(meta.sidebar_position, Some(2.0));
//! assert_eq!(body, "# Lists\n");
//! ```

mod category;
mod front_matter;

pub use category::{CategoryError, CategoryMeta};
pub use front_matter::{
    Author, FrontMatter, FrontMatterError, License, Source, Split, render, split,
};

//! Link and heading extraction from Markdown bodies.
//!
//! Walks the `pulldown-cmark` event stream once per document, collecting
//! link destinations with their source line, heading anchors, and the first
//! H1 heading text (used as a title fallback).

use std::collections::BTreeSet;

use pulldown_cmark::{CowStr, Event, HeadingLevel, LinkType, Options, Parser, Tag, TagEnd};

use crate::headings::Slugger;

/// Kind of Markdown reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkKind {
    Link,
    Image,
}

/// A reference found in a document body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkRef {
    /// Destination exactly as written (e.g., `../lists#slicing`).
    pub dest: String,
    /// Line in the original file (1-based, front matter included).
    pub line: usize,
    pub kind: LinkKind,
}

/// Everything collected from one body.
#[derive(Debug, Default)]
pub(crate) struct Extracted {
    pub links: Vec<LinkRef>,
    pub anchors: BTreeSet<String>,
    pub first_h1: Option<String>,
}

/// Heading being collected.
struct HeadingState {
    level: HeadingLevel,
    id: Option<String>,
    text: String,
}

/// Byte offsets of line starts, for offset-to-line lookup.
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(text: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { starts }
    }

    /// Line (1-based) containing `offset`.
    fn line_of(&self, offset: usize) -> usize {
        self.starts.partition_point(|&start| start <= offset)
    }
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_HEADING_ATTRIBUTES
}

/// Extract links, anchors and the first H1 from a body.
///
/// `body_line` is the line of the original file on which `body` starts.
pub(crate) fn extract(body: &str, body_line: usize) -> Extracted {
    let lines = LineIndex::new(body);
    let mut slugger = Slugger::default();
    let mut heading: Option<HeadingState> = None;
    let mut out = Extracted::default();

    for (event, range) in Parser::new_ext(body, parser_options()).into_offset_iter() {
        let line = lines.line_of(range.start) + body_line - 1;
        match event {
            Event::Start(Tag::Link {
                link_type, dest_url, ..
            }) => {
                if link_type != LinkType::Email && !dest_url.is_empty() {
                    out.links.push(LinkRef {
                        dest: dest_url.into_string(),
                        line,
                        kind: LinkKind::Link,
                    });
                }
            }
            Event::Start(Tag::Image { dest_url, .. }) => {
                if !dest_url.is_empty() {
                    out.links.push(LinkRef {
                        dest: dest_url.into_string(),
                        line,
                        kind: LinkKind::Image,
                    });
                }
            }
            Event::Start(Tag::Heading { level, id, .. }) => {
                heading = Some(HeadingState {
                    level,
                    id: id.map(CowStr::into_string),
                    text: String::new(),
                });
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some(state) = heading.as_mut() {
                    state.text.push_str(&text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(state) = heading.take() {
                    let anchor = match state.id {
                        Some(id) => slugger.claim(id),
                        None => slugger.slug(&state.text),
                    };
                    if !anchor.is_empty() {
                        out.anchors.insert(anchor);
                    }
                    if state.level == HeadingLevel::H1 && out.first_h1.is_none() {
                        let title = state.text.trim();
                        if !title.is_empty() {
                            out.first_h1 = Some(title.to_owned());
                        }
                    }
                }
            }
            _ => {}
        }
    }

    out
}

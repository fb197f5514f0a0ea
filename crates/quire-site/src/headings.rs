//! Heading anchor slugs.

use std::collections::HashMap;

/// Convert heading text to an anchor slug.
///
/// Lowercases letters, turns each whitespace character into a dash (runs are
/// not merged), keeps `-` and `_`, and drops other punctuation. This is the
/// slug rule of GitHub-style heading ids, so `__init__` stays `__init__`.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut result = String::new();
    for c in text.trim().chars() {
        if c.is_alphanumeric() {
            result.extend(c.to_lowercase());
        } else if c.is_whitespace() {
            result.push('-');
        } else if c == '-' || c == '_' {
            result.push(c);
        }
    }
    result
}

/// Assigns unique anchors to the headings of one document.
///
/// Repeated slugs get a numeric suffix: `usage`, `usage-1`, `usage-2`.
#[derive(Debug, Default)]
pub(crate) struct Slugger {
    seen: HashMap<String, usize>,
}

impl Slugger {
    /// Slug for a heading's text.
    pub(crate) fn slug(&mut self, text: &str) -> String {
        self.claim(slugify(text))
    }

    /// Register an anchor, suffixing it if already taken.
    pub(crate) fn claim(&mut self, anchor: String) -> String {
        let mut n = self.seen.get(&anchor).copied().unwrap_or(0);
        let mut unique = if n == 0 {
            anchor.clone()
        } else {
            format!("{anchor}-{n}")
        };
        // A generated suffix may collide with a heading literally named `usage-1`.
        while n > 0 && self.seen.contains_key(&unique) {
            n += 1;
            unique = format!("{anchor}-{n}");
        }
        if unique != anchor {
            self.seen.entry(unique.clone()).or_insert(1);
        }
        self.seen.insert(anchor, n + 1);
        unique
    }
}

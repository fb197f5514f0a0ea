//! Corpus path helpers.
//!
//! Corpus paths are relative to the source directory and always use `/` as
//! separator (e.g., `python/guides/iterables/while_loops.md`). Routes are the
//! site URLs derived from them (e.g., `/python/guides/iterables/while_loops`).

/// Directory part of a corpus path (`""` for files at the root).
#[must_use]
pub fn parent_dir(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(dir, _)| dir)
}

/// Last segment of a corpus path.
#[must_use]
pub fn file_name(path: &str) -> &str {
    path.rsplit_once('/').map_or(path, |(_, name)| name)
}

/// File name without its extension.
#[must_use]
pub fn file_stem(path: &str) -> &str {
    let name = file_name(path);
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    }
}

/// Extension of the last segment, if any.
#[must_use]
pub fn extension(path: &str) -> Option<&str> {
    match file_name(path).rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => Some(ext),
        _ => None,
    }
}

/// Join a directory and a relative name.
#[must_use]
pub fn join(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_owned()
    } else {
        format!("{dir}/{name}")
    }
}

/// Resolve a relative path against a base directory.
///
/// Handles `.` (current) and `..` (parent). Returns `None` when the path
/// ascends above the corpus root.
#[must_use]
pub fn normalize(base_dir: &str, relative: &str) -> Option<String> {
    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();

    for component in relative.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            _ => segments.push(component),
        }
    }

    Some(segments.join("/"))
}

/// Site route of a document.
///
/// Without a slug the route mirrors the file path minus its extension, and
/// `index` files take their directory's route:
/// - `guide.md` -> `/guide`
/// - `python/index.md` -> `/python`
/// - `index.md` -> `/`
///
/// A slug starting with `/` is an absolute route; any other slug replaces
/// the file-name segment. Returns `None` when the slug climbs above the root.
#[must_use]
pub fn route_for(path: &str, slug: Option<&str>) -> Option<String> {
    let dir = parent_dir(path);
    let joined = match slug.map(str::trim) {
        Some(slug) if slug.starts_with('/') => normalize("", slug),
        Some(slug) if !slug.is_empty() => normalize(dir, slug),
        _ => match file_stem(path) {
            "index" => Some(dir.to_owned()),
            stem => Some(join(dir, stem)),
        },
    };
    joined.map(|route| format!("/{route}"))
}

/// Convert a slug (kebab-case or `snake_case`) to title case.
///
/// Replaces `-` and `_` with spaces, then capitalizes the first letter of each word.
#[must_use]
pub fn titlecase_from_slug(slug: &str) -> String {
    let mut result = String::with_capacity(slug.len());
    for word in slug.split(['-', '_', ' ']).filter(|w| !w.is_empty()) {
        if !result.is_empty() {
            result.push(' ');
        }
        capitalize_first_into(word, &mut result);
    }
    result
}

/// Capitalize the first character of a word, appending to `buf`.
fn capitalize_first_into(word: &str, buf: &mut String) {
    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        buf.extend(first.to_uppercase());
        buf.push_str(chars.as_str());
    }
}

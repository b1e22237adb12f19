//! Heading ids and self-links.
//!
//! Every heading gets an `id` slugified from its text and an anchor child
//! linking to it. Ids are unique within a document: repeats get `-1`, `-2`, …
//! suffixes in document order. An explicit `{#id}` is kept but takes part in
//! the same deduplication.

use std::convert::Infallible;

use rustc_hash::FxHashMap;

use super::super::tree::{Document, Node};
use super::super::{Stage, Transform};

/// Id used when a heading's text slugifies to nothing.
const FALLBACK_ID: &str = "section";

/// Slugify heading text: transliterate to ASCII, lowercase, spaces to `-`,
/// drop punctuation other than `-` and `_`.
///
/// # Examples
/// ```ignore
/// assert_eq!(slugify("Hello, World!"), "hello-world");
/// assert_eq!(slugify("Über Café"), "uber-cafe");
/// ```
pub fn slugify(text: &str) -> String {
    let folded = deunicode::deunicode(text.trim());
    let mut slug = String::with_capacity(folded.len());
    for c in folded.trim().chars() {
        match c {
            c if c.is_ascii_alphanumeric() => slug.push(c.to_ascii_lowercase()),
            ' ' | '-' => slug.push('-'),
            '_' => slug.push('_'),
            _ => {}
        }
    }
    slug
}

/// Hands out unique ids within one document.
#[derive(Debug, Default)]
pub struct Slugger {
    occurrences: FxHashMap<String, usize>,
}

impl Slugger {
    pub fn unique(&mut self, base: &str) -> String {
        let base = if base.is_empty() { FALLBACK_ID } else { base };
        let mut candidate = base.to_string();
        while self.occurrences.contains_key(&candidate) {
            let count = self.occurrences.entry(base.to_string()).or_insert(0);
            *count += 1;
            candidate = format!("{base}-{count}");
        }
        self.occurrences.insert(candidate.clone(), 0);
        candidate
    }
}

/// Assigns heading ids and injects self-link anchors.
#[derive(Debug, Default)]
pub struct HeadingTransform;

impl Transform for HeadingTransform {
    const STAGE: Stage = Stage::Heading;
    type Error = Infallible;

    fn transform(&self, doc: Document) -> Result<Document, Infallible> {
        let mut slugger = Slugger::default();
        doc.try_map(|node| {
            let Node::Heading(mut heading) = node else {
                return Ok(node);
            };
            let base = match heading.id.take() {
                Some(explicit) => explicit,
                None => {
                    let mut text = String::new();
                    heading.children.iter().for_each(|n| n.push_text(&mut text));
                    slugify(&text)
                }
            };
            let id = slugger.unique(&base);
            heading.children.insert(0, Node::Anchor(id.clone()));
            heading.id = Some(id);
            Ok(Node::Heading(heading))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::convert::{MarkdownOptions, from_markdown};

    fn ids(md: &str) -> Vec<String> {
        let doc = from_markdown(md, &MarkdownOptions::default());
        let Ok(doc) = HeadingTransform.transform(doc);
        let mut out = Vec::new();
        doc.walk(&mut |n| {
            if let Node::Heading(h) = n {
                assert!(matches!(&h.children[0], Node::Anchor(a) if Some(a) == h.id.as_ref()));
                out.extend(h.id.clone());
            }
        });
        out
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Getting Started  "), "getting-started");
        assert_eq!(slugify("snake_case and-dash"), "snake_case-and-dash");
        assert_eq!(slugify("Über Café"), "uber-cafe");
        assert_eq!(slugify("???"), "");
    }

    #[test]
    fn test_duplicate_headings_get_suffixes() {
        assert_eq!(
            ids("# Intro\n\n## Intro\n\n### Intro\n"),
            ["intro", "intro-1", "intro-2"]
        );
    }

    #[test]
    fn test_explicit_id_kept_and_deduplicated() {
        assert_eq!(
            ids("# Setup {#install}\n\n# Install\n\n# Other {#install}\n"),
            ["install", "install-1", "install-2"]
        );
    }

    #[test]
    fn test_suffix_does_not_shadow_literal_heading() {
        assert_eq!(ids("# A\n\n# A\n\n# A 1\n"), ["a", "a-1", "a-1-1"]);
    }

    #[test]
    fn test_empty_heading_text() {
        assert_eq!(ids("# !!!\n\n# ???\n"), ["section", "section-1"]);
    }

    #[test]
    fn test_inline_markup_flattened() {
        assert_eq!(ids("## Using `cargo` with *style*\n"), ["using-cargo-with-style"]);
    }
}

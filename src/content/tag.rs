//! Tag normalization and counting.
//!
//! Tags are folded to kebab-case so spelling variants share one key:
//!
//! | Raw tag        | Key          |
//! |----------------|--------------|
//! | `Web Dev`      | `web-dev`    |
//! | `web-dev`      | `web-dev`    |
//! | `webDev`       | `web-dev`    |
//! | `XMLHttp`      | `xml-http`   |
//! | `Vue3`         | `vue-3`      |
//! | `Café`         | `cafe`       |

use std::collections::BTreeMap;

/// Normalized tag → occurrence count.
pub type TagCount = BTreeMap<String, usize>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Upper,
    Lower,
    Digit,
}

impl CharClass {
    fn of(c: char) -> Option<Self> {
        if c.is_ascii_uppercase() {
            Some(Self::Upper)
        } else if c.is_ascii_lowercase() {
            Some(Self::Lower)
        } else if c.is_ascii_digit() {
            Some(Self::Digit)
        } else {
            None
        }
    }

    fn is_letter(self) -> bool {
        !matches!(self, Self::Digit)
    }
}

/// Fold a raw tag to its kebab-case key. May return an empty string for
/// tags without any alphanumeric character.
pub fn normalize_tag(raw: &str) -> String {
    let ascii = deunicode::deunicode(raw);
    let chars: Vec<char> = ascii.chars().filter(|c| !matches!(c, '\'' | '`')).collect();

    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev: Option<CharClass> = None;

    for (i, &c) in chars.iter().enumerate() {
        let Some(class) = CharClass::of(c) else {
            flush(&mut words, &mut current);
            prev = None;
            continue;
        };

        if let Some(p) = prev {
            let next = chars.get(i + 1).copied().and_then(CharClass::of);
            let boundary = (p == CharClass::Lower && class == CharClass::Upper)
                || (p.is_letter() != class.is_letter())
                || (p == CharClass::Upper
                    && class == CharClass::Upper
                    && next == Some(CharClass::Lower));
            if boundary {
                flush(&mut words, &mut current);
            }
        }

        current.push(c.to_ascii_lowercase());
        prev = Some(class);
    }
    flush(&mut words, &mut current);

    words.join("-")
}

fn flush(words: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        words.push(std::mem::take(current));
    }
}

/// Add one occurrence of `raw` under its normalized key.
///
/// Returns `false` when the tag normalizes to nothing and was skipped.
pub fn count_tag(counts: &mut TagCount, raw: &str) -> bool {
    let key = normalize_tag(raw);
    if key.is_empty() {
        return false;
    }
    *counts.entry(key).or_insert(0) += 1;
    true
}

/// Merge `other` into `into`, summing shared keys.
pub fn merge_counts(into: &mut TagCount, other: TagCount) {
    for (tag, n) in other {
        *into.entry(tag).or_insert(0) += n;
    }
}

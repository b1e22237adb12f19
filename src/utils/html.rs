//! HTML escaping for rendered output.
//!
//! | Context     | Escaped           |
//! |-------------|-------------------|
//! | text        | `<` `>` `&`       |
//! | attribute   | `<` `>` `&` `"` `'` |
//!
//! Both return `Cow::Borrowed` when nothing needs escaping.

use std::borrow::Cow;

const TEXT_CHARS: &[char] = &['<', '>', '&'];
const ATTR_CHARS: &[char] = &['<', '>', '&', '"', '\''];

#[inline]
fn entity(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        _ => None,
    }
}

/// Escape text content.
#[inline]
pub fn escape(s: &str) -> Cow<'_, str> {
    escape_set(s, TEXT_CHARS)
}

/// Escape a value placed inside a quoted attribute.
#[inline]
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    escape_set(s, ATTR_CHARS)
}

fn escape_set<'a>(s: &'a str, set: &[char]) -> Cow<'a, str> {
    let Some(first) = s.find(set) else {
        return Cow::Borrowed(s);
    };

    let mut out = String::with_capacity(s.len() + 8);
    out.push_str(&s[..first]);
    for c in s[first..].chars() {
        match entity(c).filter(|_| set.contains(&c)) {
            Some(e) => out.push_str(e),
            None => out.push(c),
        }
    }
    Cow::Owned(out)
}

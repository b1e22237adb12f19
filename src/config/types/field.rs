//! Dotted config field paths.

use std::fmt;

/// Path of a config field, `<section>.<key>` (e.g. `build.image_prefix`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath(&'static str);

impl FieldPath {
    #[inline]
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }

    /// `build` for `build.image_prefix`.
    pub fn section(&self) -> &'static str {
        self.0.split_once('.').map_or(self.0, |(section, _)| section)
    }

    /// `image_prefix` for `build.image_prefix`; the whole path when there
    /// is no section.
    pub fn key(&self) -> &'static str {
        self.0.split_once('.').map_or(self.0, |(_, key)| key)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_and_key() {
        let path = FieldPath::new("markdown.token_classes.keyword");
        assert_eq!(path.section(), "markdown");
        assert_eq!(path.key(), "token_classes.keyword");
        assert_eq!(path.to_string(), "markdown.token_classes.keyword");

        let bare = FieldPath::new("root");
        assert_eq!(bare.section(), "root");
        assert_eq!(bare.key(), "root");
    }
}

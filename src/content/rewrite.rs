//! Image reference rewriting for content stored in subdirectories.
//!
//! Images next to a post are published under `<image_prefix>/<type>/…`
//! (see `asset::sync`), so a relative `![alt](img.png)` inside
//! `blog/sub/post.md` must point at `/static/images/blog/sub/img.png`.
//!
//! | Source `src`            | Result                                |
//! |-------------------------|---------------------------------------|
//! | `img.png`               | `/static/images/blog/sub/img.png`     |
//! | `./img.png`             | `/static/images/blog/sub/img.png`     |
//! | `../shared/img.png`     | `/static/images/blog/shared/img.png`  |
//! | `/static/logo.png`      | unchanged                             |
//! | `https://x.dev/a.png`   | unchanged                             |
//!
//! Every rewritten `src` is absolute, so running the rewriter twice over the
//! same text leaves it unchanged the second time. Only real image nodes are
//! rewritten: image syntax inside code spans and code blocks is left alone.

use std::borrow::Cow;
use std::path::Path;
use std::sync::LazyLock;

use pulldown_cmark::{Event, Parser, Tag};
use regex::{Captures, Regex};

use super::slug::display_rel;
use crate::debug;
use crate::pipeline::convert::MarkdownOptions;
use crate::utils::path::route::{is_external_link, join_url, normalize_relative};

/// `![alt](src "optional title")`
static IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"!\[(?P<alt>[^\]]*)\]\((?P<src>[^)\s]+)(?P<title>\s+"[^"]*")?\)"#)
        .expect("image pattern is valid")
});

/// Syntactic classification of an image `src`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSrc<'a> {
    /// Has a URL scheme or is protocol-relative.
    External(&'a str),
    /// Site-root path (`/static/…`).
    Absolute(&'a str),
    /// Relative to the content file.
    Relative(&'a str),
}

impl<'a> ImageSrc<'a> {
    pub fn parse(src: &'a str) -> Self {
        if is_external_link(src) {
            Self::External(src)
        } else if src.starts_with('/') {
            Self::Absolute(src)
        } else {
            Self::Relative(src)
        }
    }
}

/// Rewrites relative image references to deployment-stable absolute paths.
#[derive(Debug, Clone)]
pub struct ImageRewriter {
    /// `<image_prefix>/<content type>`, e.g. `/static/images/blog`.
    base: String,
}

impl ImageRewriter {
    pub fn new(image_prefix: &str, content_type: &str) -> Self {
        Self {
            base: join_url([image_prefix, content_type]),
        }
    }

    /// Rewrite image references in `body` for a file found in `source_dir`
    /// (relative to the content-type root).
    ///
    /// Returns the body untouched for files at the content-type root.
    pub fn rewrite<'a>(&self, body: &'a str, source_dir: &Path) -> Cow<'a, str> {
        let dir = display_rel(source_dir);
        if dir.is_empty() || !body.contains("![") {
            return Cow::Borrowed(body);
        }

        let mut out = String::with_capacity(body.len() + 64);
        let mut last = 0;

        let parser = Parser::new_ext(body, MarkdownOptions::default().to_pulldown_options());
        for (event, range) in parser.into_offset_iter() {
            let Event::Start(Tag::Image { .. }) = event else {
                continue;
            };
            // Nested inside an image already copied
            if range.start < last {
                continue;
            }
            // Reference-style images carry no inline `src`
            let Some(caps) = IMAGE_RE
                .captures(&body[range.clone()])
                .filter(|caps| caps.get(0).is_some_and(|m| m.start() == 0))
            else {
                continue;
            };

            let whole = caps.get(0).map_or(0, |m| m.end());
            out.push_str(&body[last..range.start]);
            out.push_str(&self.rewrite_match(&caps, &dir));
            last = range.start + whole;
        }

        if last == 0 {
            return Cow::Borrowed(body);
        }
        out.push_str(&body[last..]);
        if out == body {
            Cow::Borrowed(body)
        } else {
            Cow::Owned(out)
        }
    }

    fn rewrite_match(&self, caps: &Captures<'_>, dir: &str) -> String {
        let whole = &caps[0];
        let src = &caps["src"];

        let ImageSrc::Relative(rel) = ImageSrc::parse(src) else {
            return whole.to_string();
        };

        let Some(target) = normalize_relative(&format!("{dir}/{rel}")) else {
            debug!("rewrite"; "image `{}` escapes the content root, left as is", src);
            return whole.to_string();
        };

        let alt = &caps["alt"];
        let title = caps.name("title").map_or("", |m| m.as_str());
        format!("![{alt}]({}{title})", join_url([self.base.as_str(), target.as_str()]))
    }
}

//! URL path utilities.
//!
//! - Link type detection (external vs internal)
//! - Lexical normalization of relative paths (`.` and `..` segments)
//! - Joining URL segments with a single `/`

/// Check if a link is external (has a URL scheme like http:, mailto:, etc.)
///
/// A valid scheme must:
/// - Have at least 1 character before the colon
/// - Only contain ASCII alphanumeric or `+`, `-`, `.`
///
/// Protocol-relative links (`//cdn.example.com/x.png`) count as external.
///
/// # Examples
/// ```ignore
/// assert!(is_external_link("https://example.com"));
/// assert!(is_external_link("mailto:user@example.com"));
/// assert!(!is_external_link("/about"));
/// assert!(!is_external_link("./file.txt"));
/// ```
#[inline]
pub fn is_external_link(link: &str) -> bool {
    if link.starts_with("//") {
        return true;
    }
    link.find(':').is_some_and(|pos| {
        pos > 0
            && link[..pos]
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

/// Normalize a `/`-separated relative path, resolving `.` and `..`.
///
/// Returns `None` when a `..` climbs above the starting point.
///
/// # Examples
/// ```ignore
/// assert_eq!(normalize_relative("sub/./img.png").as_deref(), Some("sub/img.png"));
/// assert_eq!(normalize_relative("sub/../img.png").as_deref(), Some("img.png"));
/// assert_eq!(normalize_relative("../img.png"), None);
/// ```
pub fn normalize_relative(path: &str) -> Option<String> {
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            seg => parts.push(seg),
        }
    }
    Some(parts.join("/"))
}

/// Join URL segments with exactly one `/` between them and a leading `/`.
///
/// Empty segments are skipped.
pub fn join_url<'a>(segments: impl IntoIterator<Item = &'a str>) -> String {
    let mut url = String::new();
    for segment in segments {
        let trimmed = segment.trim_matches('/');
        if trimmed.is_empty() {
            continue;
        }
        url.push('/');
        url.push_str(trimmed);
    }
    if url.is_empty() {
        url.push('/');
    }
    url
}

/// Split a URL into path and fragment parts
///
/// # Examples
/// ```ignore
/// assert_eq!(split_path_fragment("/about#team"), ("/about", "team"));
/// assert_eq!(split_path_fragment("/about"), ("/about", ""));
/// ```
#[inline]
pub fn split_path_fragment(url: &str) -> (&str, &str) {
    url.split_once('#').unwrap_or((url, ""))
}

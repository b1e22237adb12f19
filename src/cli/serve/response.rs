//! HTTP response handlers.
//!
//! Error bodies carry only a status phrase, never a filesystem path.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tiny_http::{Header, Method, Request, Response, StatusCode};

use crate::content::ContentError;
use crate::utils::mime::{self, types::PLAIN};

/// Respond with an image, marked as immutable for `cache_control`.
pub fn respond_file(request: Request, path: &Path, cache_control: &str) -> Result<()> {
    let content_type = mime::from_path(path);
    let headers = [
        make_header("Content-Type", content_type)?,
        make_header("Cache-Control", cache_control)?,
    ];

    if is_head_request(&request) {
        let mut response = Response::empty(StatusCode(200));
        for header in headers {
            response.add_header(header);
        }
        request.respond(response)?;
        return Ok(());
    }

    let body = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let mut response = Response::from_data(body);
    for header in headers {
        response.add_header(header);
    }
    request.respond(response)?;
    Ok(())
}

/// Map a resolution error to its client-facing status.
pub fn status_for(error: &ContentError) -> u16 {
    match error {
        ContentError::NotFound(_) => 404,
        ContentError::PathTraversal | ContentError::UnsupportedFileType(_) => 403,
        _ => 500,
    }
}

/// Respond with the status for `error` and a bare reason phrase.
pub fn respond_error(request: Request, error: &ContentError) -> Result<()> {
    send_status(request, status_for(error))
}

/// Only `GET` and `HEAD` are routed.
pub fn respond_method_not_allowed(request: Request) -> Result<()> {
    send_status(request, 405)
}

/// Server is shutting down.
pub fn respond_unavailable(request: Request) -> Result<()> {
    send_status(request, 503)
}

pub fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

pub fn is_routable(method: &Method) -> bool {
    matches!(method, Method::Get | Method::Head)
}

fn send_status(request: Request, status: u16) -> Result<()> {
    let reason = reason_phrase(status);
    let response = Response::from_string(format!("{status} {reason}"))
        .with_status_code(StatusCode(status))
        .with_header(make_header("Content-Type", PLAIN)?);
    request.respond(response)?;
    Ok(())
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        503 => "Service Unavailable",
        _ => "Internal Server Error",
    }
}

fn make_header(key: &str, value: &str) -> Result<Header> {
    Header::from_bytes(key.as_bytes(), value.as_bytes())
        .map_err(|()| anyhow!("invalid `{key}` header value"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_status_for() {
        assert_eq!(status_for(&ContentError::NotFound("x".into())), 404);
        assert_eq!(status_for(&ContentError::PathTraversal), 403);
        assert_eq!(status_for(&ContentError::UnsupportedFileType("md".into())), 403);
        assert_eq!(
            status_for(&ContentError::CycleDetected(PathBuf::from("/a"))),
            500
        );
    }

    #[test]
    fn test_make_header_rejects_invalid_values() {
        assert!(make_header("Cache-Control", "public, max-age=1").is_ok());
        assert!(make_header("Cache-Control", "max-age=1 é").is_err());
    }
}

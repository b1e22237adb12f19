//! Math lowering.
//!
//! Validates TeX source and lowers `$…$` / `$$…$$` nodes to the markup
//! KaTeX auto-render picks up on the client:
//!
//! ```html
//! <span class="math math-inline">e^{i\pi}</span>
//! <span class="math math-display">\int_0^1 x\,dx</span>
//! ```

use std::sync::LazyLock;

use regex::Regex;

use super::super::tree::{Document, Math, Node};
use super::super::{Stage, Transform};
use crate::utils::html::escape;

/// `\begin{env}` / `\end{env}`
static ENV_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\(?P<kind>begin|end)\s*\{(?P<name>[^{}]*)\}").expect("environment pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MathError {
    #[error("unbalanced braces in `{0}`")]
    UnbalancedBraces(String),
    #[error("`\\begin{{{0}}}` has no matching `\\end`")]
    UnclosedEnvironment(String),
    #[error("`\\end{{{0}}}` has no matching `\\begin`")]
    UnexpectedEnd(String),
}

/// Check brace balance and environment nesting. Escaped braces (`\{`) do not count.
pub fn validate(tex: &str) -> Result<(), MathError> {
    let mut depth: usize = 0;
    let mut chars = tex.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '{' => depth += 1,
            '}' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| MathError::UnbalancedBraces(tex.to_string()))?;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(MathError::UnbalancedBraces(tex.to_string()));
    }

    let mut open: Vec<&str> = Vec::new();
    for caps in ENV_RE.captures_iter(tex) {
        let name = caps.name("name").map_or("", |m| m.as_str().trim());
        if &caps["kind"] == "begin" {
            open.push(name);
        } else if open.pop() != Some(name) {
            return Err(MathError::UnexpectedEnd(name.to_string()));
        }
    }
    match open.pop() {
        Some(name) => Err(MathError::UnclosedEnvironment(name.to_string())),
        None => Ok(()),
    }
}

fn lower(math: &Math) -> String {
    let kind = if math.display { "display" } else { "inline" };
    format!(
        r#"<span class="math math-{kind}">{}</span>"#,
        escape(math.tex.trim())
    )
}

/// Validates and lowers math nodes.
#[derive(Debug, Default)]
pub struct MathTransform;

impl Transform for MathTransform {
    const STAGE: Stage = Stage::Math;
    type Error = MathError;

    fn transform(&self, doc: Document) -> Result<Document, MathError> {
        doc.try_map(|node| match node {
            Node::Math(math) => {
                validate(&math.tex)?;
                Ok(Node::Html(lower(&math)))
            }
            other => Ok(other),
        })
    }
}

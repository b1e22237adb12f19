//! Code block tokenization.
//!
//! Source is tokenized with syntect grammars, each scope stack is reduced
//! to a token kind (`keyword`, `string`, …), and the kind is mapped through
//! the configured [`TokenClasses`] table. Kinds missing from the table and
//! scopes with no kind produce unclassified text. Neighbouring spans with the
//! same class are merged, so a block in an unknown language is one token.

use std::sync::LazyLock;

use syntect::parsing::{ParseState, Scope, ScopeStack, SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use super::super::tree::{CodeBlock, Document, Highlighted, Node, Token};
use super::super::{Stage, Transform};
use crate::config::section::TokenClasses;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);

/// Scope prefix → token kind, checked innermost scope last so it wins.
const SCOPE_KINDS: &[(&str, &str)] = &[
    ("constant.language.boolean", "boolean"),
    ("entity.name.tag", "tag"),
    ("entity.other.attribute-name", "attr-name"),
    ("markup.deleted", "deleted"),
    ("markup.inserted", "inserted"),
    ("entity.name.function", "function"),
    ("support.function", "function"),
    ("variable.function", "function"),
    ("keyword", "keyword"),
    ("storage", "keyword"),
    ("punctuation", "punctuation"),
];

/// Scopes that make strings inside them attribute values.
const ATTRIBUTE_SCOPES: &[&str] = &["meta.attribute-with-value", "meta.tag"];

#[derive(Debug, thiserror::Error)]
#[error("cannot tokenize `{lang}`: {reason}")]
pub struct HighlightError {
    lang: String,
    reason: String,
}

/// `scope` equals `prefix` or starts with `prefix.`
fn has_prefix(scope: &str, prefix: &str) -> bool {
    scope
        .strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
}

/// Reduce a scope stack (outermost first) to a token kind.
///
/// Comments and strings swallow everything nested in them, matching how
/// a string's quotes belong to the string token.
pub fn token_kind(scopes: &[Scope]) -> Option<&'static str> {
    let names: Vec<String> = scopes.iter().map(|s| s.build_string()).collect();
    let mut kind = None;

    for (i, name) in names.iter().enumerate() {
        if has_prefix(name, "comment") {
            return Some("comment");
        }
        if has_prefix(name, "string") {
            let in_attribute = names[..i]
                .iter()
                .any(|outer| ATTRIBUTE_SCOPES.iter().any(|p| has_prefix(outer, p)));
            return Some(if in_attribute { "attr-value" } else { "string" });
        }
        if let Some((_, k)) = SCOPE_KINDS.iter().find(|(prefix, _)| has_prefix(name, prefix)) {
            kind = Some(*k);
        }
    }
    kind
}

fn find_syntax(lang: &str) -> &'static SyntaxReference {
    SYNTAX_SET
        .find_syntax_by_token(lang)
        .unwrap_or_else(|| SYNTAX_SET.find_syntax_plain_text())
}

/// Accumulates tokens, merging neighbours that share a class.
#[derive(Default)]
struct TokenBuffer {
    tokens: Vec<Token>,
}

impl TokenBuffer {
    fn push(&mut self, text: &str, class: Option<&str>) {
        if text.is_empty() {
            return;
        }
        if let Some(last) = self.tokens.last_mut()
            && last.class.as_deref() == class
        {
            last.text.push_str(text);
            return;
        }
        self.tokens.push(Token {
            text: text.to_string(),
            class: class.map(str::to_string),
        });
    }
}

/// Tokenizes fenced code and attaches style classes.
pub struct CodeTransform<'a> {
    classes: &'a TokenClasses,
}

impl<'a> CodeTransform<'a> {
    pub fn new(classes: &'a TokenClasses) -> Self {
        Self { classes }
    }

    fn highlight(&self, code: CodeBlock) -> Result<Highlighted, HighlightError> {
        let CodeBlock {
            lang,
            title,
            source,
        } = code;

        let tokens = match lang.as_deref() {
            Some(lang) => self.tokenize(lang, &source)?,
            None => vec![Token {
                text: source,
                class: None,
            }],
        };

        Ok(Highlighted {
            lang,
            title,
            tokens,
        })
    }

    fn tokenize(&self, lang: &str, source: &str) -> Result<Vec<Token>, HighlightError> {
        let fail = |reason: String| HighlightError {
            lang: lang.to_string(),
            reason,
        };

        let mut state = ParseState::new(find_syntax(lang));
        let mut stack = ScopeStack::new();
        let mut buffer = TokenBuffer::default();

        for line in LinesWithEndings::from(source) {
            let ops = state
                .parse_line(line, &SYNTAX_SET)
                .map_err(|e| fail(format!("{e:?}")))?;

            let mut cursor = 0;
            for (offset, op) in ops {
                if offset > cursor {
                    buffer.push(&line[cursor..offset], self.class_of(&stack));
                    cursor = offset;
                }
                stack.apply(&op).map_err(|e| fail(format!("{e:?}")))?;
            }
            buffer.push(&line[cursor..], self.class_of(&stack));
        }

        Ok(buffer.tokens)
    }

    fn class_of(&self, stack: &ScopeStack) -> Option<&str> {
        token_kind(stack.as_slice()).and_then(|kind| self.classes.get(kind))
    }
}

impl Transform for CodeTransform<'_> {
    const STAGE: Stage = Stage::Highlight;
    type Error = HighlightError;

    fn transform(&self, doc: Document) -> Result<Document, HighlightError> {
        doc.try_map(|node| match node {
            Node::Code(code) => self.highlight(code).map(Node::Highlighted),
            other => Ok(other),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::convert::{MarkdownOptions, from_markdown};

    fn scopes(names: &[&str]) -> Vec<Scope> {
        names.iter().map(|n| Scope::new(n).unwrap()).collect()
    }

    fn highlight(md: &str) -> Highlighted {
        let classes = TokenClasses::default();
        let doc = CodeTransform::new(&classes)
            .transform(from_markdown(md, &MarkdownOptions::default()))
            .unwrap();
        match doc.children.into_iter().next() {
            Some(Node::Highlighted(h)) => h,
            other => panic!("expected highlighted code, got {other:?}"),
        }
    }

    fn class_of<'a>(h: &'a Highlighted, text: &str) -> Option<&'a str> {
        h.tokens
            .iter()
            .find(|t| t.text.contains(text))
            .and_then(|t| t.class.as_deref())
    }

    #[test]
    fn test_token_kind_rules() {
        assert_eq!(token_kind(&scopes(&["source.js", "comment.line.double-slash.js"])), Some("comment"));
        assert_eq!(
            token_kind(&scopes(&["source.js", "string.quoted.double.js", "punctuation.definition.string.begin.js"])),
            Some("string")
        );
        assert_eq!(
            token_kind(&scopes(&["text.html.basic", "meta.tag.inline.any.html", "meta.attribute-with-value.html", "string.quoted.double.html"])),
            Some("attr-value")
        );
        assert_eq!(token_kind(&scopes(&["source.js", "constant.language.boolean.true.js"])), Some("boolean"));
        assert_eq!(token_kind(&scopes(&["source.rust", "storage.type.rust"])), Some("keyword"));
        assert_eq!(token_kind(&scopes(&["source.rust", "meta.function.rust", "entity.name.function.rust"])), Some("function"));
        assert_eq!(token_kind(&scopes(&["source.rust", "variable.other.rust"])), None);
        assert_eq!(token_kind(&scopes(&["source.diff", "markup.inserted.diff"])), Some("inserted"));
    }

    #[test]
    fn test_has_prefix_is_segment_aware() {
        assert!(has_prefix("string.quoted", "string"));
        assert!(has_prefix("string", "string"));
        assert!(!has_prefix("stringy", "string"));
    }

    #[test]
    fn test_rust_keywords_and_strings() {
        let h = highlight("```rust\nfn main() { let s = \"hi\"; }\n```\n");
        assert_eq!(h.lang.as_deref(), Some("rust"));
        assert_eq!(class_of(&h, "fn"), Some("text-code-purple"));
        assert_eq!(class_of(&h, "\"hi\""), Some("text-code-green"));
        let joined: String = h.tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(joined, "fn main() { let s = \"hi\"; }\n");
    }

    #[test]
    fn test_comment_class() {
        let h = highlight("```js\n// note\n```\n");
        assert_eq!(class_of(&h, "note"), Some("text-gray-400 italic"));
    }

    #[test]
    fn test_unknown_language_is_plain() {
        let h = highlight("```nosuchlang\nsome text\nmore\n```\n");
        assert_eq!(
            h.tokens,
            vec![Token { text: "some text\nmore\n".into(), class: None }]
        );
    }

    #[test]
    fn test_no_language_single_token_and_title_kept() {
        let h = highlight("```\nraw <b>\n```\n");
        assert_eq!(h.tokens, vec![Token { text: "raw <b>\n".into(), class: None }]);

        let titled = highlight("```rust:main.rs\nfn f() {}\n```\n");
        assert_eq!(titled.title.as_deref(), Some("main.rs"));
    }

    #[test]
    fn test_custom_class_table() {
        let classes = TokenClasses::from_iter([("keyword", "kw")]);
        let doc = CodeTransform::new(&classes)
            .transform(from_markdown("```rust\nfn x() {}\n```\n", &MarkdownOptions::default()))
            .unwrap();
        let Some(Node::Highlighted(h)) = doc.children.first() else {
            panic!("expected highlighted code");
        };
        assert_eq!(class_of(h, "fn"), Some("kw"));
        assert!(h.tokens.iter().filter_map(|t| t.class.as_deref()).all(|c| c == "kw"));
    }
}

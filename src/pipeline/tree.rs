//! Document tree.
//!
//! A closed set of node kinds produced by [`convert`](super::convert) and
//! rewritten by the transform stages. Stages replace nodes with their
//! lowered forms:
//!
//! | Parsed           | Lowered by   | Into                  |
//! |------------------|--------------|-----------------------|
//! | `Image`          | image stage  | `Component::Image`    |
//! | `Heading`        | heading stage| `Heading` + `Anchor`  |
//! | `Math`           | math stage   | `Html`                |
//! | `Code`           | code stage   | `Highlighted`         |

/// Column alignment of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    None,
    Left,
    Center,
    Right,
}

impl Align {
    pub fn as_str(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Left => Some("left"),
            Self::Center => Some("center"),
            Self::Right => Some("right"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    pub level: u8,
    /// Explicit `{#id}` from the source, or the id assigned by the heading stage.
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub src: String,
    pub title: String,
    pub alt: String,
}

/// Fenced or indented code before highlighting.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    pub lang: Option<String>,
    /// From a `lang:title` info string.
    pub title: Option<String>,
    pub source: String,
}

/// A run of highlighted source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub class: Option<String>,
}

/// Code after tokenization.
#[derive(Debug, Clone, PartialEq)]
pub struct Highlighted {
    pub lang: Option<String>,
    pub title: Option<String>,
    pub tokens: Vec<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Math {
    pub display: bool,
    pub tex: String,
}

/// Structured components the front end renders itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    Image {
        alt: String,
        src: String,
        title: String,
        width: u32,
        height: u32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    // Blocks
    Paragraph(Vec<Node>),
    Heading(Heading),
    BlockQuote(Vec<Node>),
    List { start: Option<u64>, items: Vec<Node> },
    Item(Vec<Node>),
    Code(CodeBlock),
    Highlighted(Highlighted),
    Table { align: Vec<Align>, rows: Vec<Node> },
    TableHead(Vec<Node>),
    TableRow(Vec<Node>),
    TableCell(Vec<Node>),
    FootnoteDefinition { label: String, children: Vec<Node> },
    Rule,
    /// Raw HTML or JSX, passed through verbatim.
    Html(String),

    // Inlines
    Text(String),
    Emphasis(Vec<Node>),
    Strong(Vec<Node>),
    Strikethrough(Vec<Node>),
    Link { url: String, title: String, children: Vec<Node> },
    Image(Image),
    InlineCode(String),
    SoftBreak,
    HardBreak,
    FootnoteReference(String),
    TaskMarker(bool),
    Math(Math),

    // Lowered
    Component(Component),
    /// Self-link injected into a heading; holds the target id.
    Anchor(String),
}

impl Node {
    /// Child list of container nodes.
    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Self::Paragraph(c)
            | Self::BlockQuote(c)
            | Self::Item(c)
            | Self::TableHead(c)
            | Self::TableRow(c)
            | Self::TableCell(c)
            | Self::Emphasis(c)
            | Self::Strong(c)
            | Self::Strikethrough(c) => Some(c),
            Self::Heading(h) => Some(&mut h.children),
            Self::List { items, .. } => Some(items),
            Self::Table { rows, .. } => Some(rows),
            Self::FootnoteDefinition { children, .. } | Self::Link { children, .. } => {
                Some(children)
            }
            Self::Code(_)
            | Self::Highlighted(_)
            | Self::Rule
            | Self::Html(_)
            | Self::Text(_)
            | Self::Image(_)
            | Self::InlineCode(_)
            | Self::SoftBreak
            | Self::HardBreak
            | Self::FootnoteReference(_)
            | Self::TaskMarker(_)
            | Self::Math(_)
            | Self::Component(_)
            | Self::Anchor(_) => None,
        }
    }

    /// Rebuild the subtree bottom-up: children first, then `f` on the node.
    pub fn try_map<E, F>(mut self, f: &mut F) -> Result<Node, E>
    where
        F: FnMut(Node) -> Result<Node, E>,
    {
        if let Some(children) = self.children_mut() {
            *children = map_all(std::mem::take(children), f)?;
        }
        f(self)
    }

    /// Append the visible text of this subtree to `out`.
    pub fn push_text(&self, out: &mut String) {
        match self {
            Self::Text(t) | Self::InlineCode(t) => out.push_str(t),
            Self::SoftBreak | Self::HardBreak => out.push(' '),
            Self::Image(img) => out.push_str(&img.alt),
            Self::Math(m) => out.push_str(&m.tex),
            Self::Paragraph(c)
            | Self::BlockQuote(c)
            | Self::Item(c)
            | Self::TableHead(c)
            | Self::TableRow(c)
            | Self::TableCell(c)
            | Self::Emphasis(c)
            | Self::Strong(c)
            | Self::Strikethrough(c) => c.iter().for_each(|n| n.push_text(out)),
            Self::Heading(h) => h.children.iter().for_each(|n| n.push_text(out)),
            Self::Link { children, .. } => children.iter().for_each(|n| n.push_text(out)),
            _ => {}
        }
    }

    /// Visible text of this subtree.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.push_text(&mut out);
        out
    }

    /// Whitespace-only text and line breaks carry no content.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(t) => t.trim().is_empty(),
            Self::SoftBreak | Self::HardBreak => true,
            _ => false,
        }
    }
}

fn map_all<E, F>(nodes: Vec<Node>, f: &mut F) -> Result<Vec<Node>, E>
where
    F: FnMut(Node) -> Result<Node, E>,
{
    nodes.into_iter().map(|n| n.try_map(f)).collect()
}

/// Root of a converted body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub children: Vec<Node>,
}

impl Document {
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }

    /// Apply `f` to every node, bottom-up, in document order.
    pub fn try_map<E, F>(self, mut f: F) -> Result<Self, E>
    where
        F: FnMut(Node) -> Result<Node, E>,
    {
        Ok(Self {
            children: map_all(self.children, &mut f)?,
        })
    }

    /// Visit every node depth-first, parents before children.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Node)) {
        fn go<'a>(nodes: &'a [Node], f: &mut impl FnMut(&'a Node)) {
            for node in nodes {
                f(node);
                match node {
                    Node::Paragraph(c)
                    | Node::BlockQuote(c)
                    | Node::Item(c)
                    | Node::TableHead(c)
                    | Node::TableRow(c)
                    | Node::TableCell(c)
                    | Node::Emphasis(c)
                    | Node::Strong(c)
                    | Node::Strikethrough(c) => go(c, f),
                    Node::Heading(h) => go(&h.children, f),
                    Node::List { items, .. } => go(items, f),
                    Node::Table { rows, .. } => go(rows, f),
                    Node::FootnoteDefinition { children, .. } | Node::Link { children, .. } => {
                        go(children, f)
                    }
                    _ => {}
                }
            }
        }
        go(&self.children, f);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Node {
        Node::Text(s.to_string())
    }

    #[test]
    fn test_try_map_is_bottom_up_in_order() {
        let doc = Document::new(vec![
            Node::Paragraph(vec![text("a"), Node::Strong(vec![text("b")])]),
            text("c"),
        ]);

        let mut seen = Vec::new();
        let out: Result<_, ()> = doc.try_map(|node| {
            if let Node::Text(t) = &node {
                seen.push(t.clone());
            }
            Ok(node)
        });

        assert!(out.is_ok());
        assert_eq!(seen, ["a", "b", "c"]);
    }

    #[test]
    fn test_try_map_short_circuits() {
        let doc = Document::new(vec![text("ok"), text("bad"), text("never")]);
        let mut visited = 0;
        let out = doc.try_map(|node| {
            visited += 1;
            match &node {
                Node::Text(t) if t == "bad" => Err("boom"),
                _ => Ok(node),
            }
        });
        assert_eq!(out, Err("boom"));
        assert_eq!(visited, 2);
    }

    #[test]
    fn test_text_flattens_inlines() {
        let heading = Node::Heading(Heading {
            level: 2,
            id: None,
            classes: vec![],
            children: vec![
                text("Hello "),
                Node::Emphasis(vec![text("big")]),
                text(" "),
                Node::InlineCode("world".into()),
            ],
        });
        assert_eq!(heading.text(), "Hello big world");
    }

    #[test]
    fn test_walk_visits_nested() {
        let doc = Document::new(vec![Node::List {
            start: None,
            items: vec![Node::Item(vec![Node::Paragraph(vec![text("x")])])],
        }]);
        let mut count = 0;
        doc.walk(&mut |_| count += 1);
        assert_eq!(count, 4);
    }
}

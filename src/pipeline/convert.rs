//! Markdown to [`Document`] conversion using pulldown-cmark.

use pulldown_cmark::{Alignment, CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag};

use super::tree::{Align, CodeBlock, Document, Heading, Image, Math, Node};

/// Options for markdown conversion
#[derive(Debug, Clone)]
pub struct MarkdownOptions {
    pub tables: bool,
    pub footnotes: bool,
    pub strikethrough: bool,
    pub task_lists: bool,
    /// `# Heading {#custom-id}`
    pub heading_attributes: bool,
    /// `$inline$` and `$$display$$`
    pub math: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            tables: true,
            footnotes: true,
            strikethrough: true,
            task_lists: true,
            heading_attributes: true,
            math: true,
        }
    }
}

impl MarkdownOptions {
    pub(crate) fn to_pulldown_options(&self) -> Options {
        let mut opts = Options::empty();
        if self.tables {
            opts.insert(Options::ENABLE_TABLES);
        }
        if self.footnotes {
            opts.insert(Options::ENABLE_FOOTNOTES);
        }
        if self.strikethrough {
            opts.insert(Options::ENABLE_STRIKETHROUGH);
        }
        if self.task_lists {
            opts.insert(Options::ENABLE_TASKLISTS);
        }
        if self.heading_attributes {
            opts.insert(Options::ENABLE_HEADING_ATTRIBUTES);
        }
        if self.math {
            opts.insert(Options::ENABLE_MATH);
        }
        opts
    }
}

/// An element waiting for its end tag.
enum Open {
    Paragraph,
    Heading {
        level: u8,
        id: Option<String>,
        classes: Vec<String>,
    },
    BlockQuote,
    List(Option<u64>),
    Item,
    Code {
        lang: Option<String>,
        title: Option<String>,
    },
    HtmlBlock,
    Table(Vec<Align>),
    TableHead,
    TableRow,
    TableCell,
    Footnote(String),
    Emphasis,
    Strong,
    Strikethrough,
    Link {
        url: String,
        title: String,
    },
    Image {
        src: String,
        title: String,
    },
    /// Constructs without a node of their own; children go to the parent.
    Transparent,
}

/// Stack frame for tracking nested elements
struct StackFrame {
    open: Open,
    children: Vec<Node>,
}

struct MarkdownConverter {
    stack: Vec<StackFrame>,
    root_children: Vec<Node>,
}

impl MarkdownConverter {
    fn new() -> Self {
        Self {
            stack: Vec::new(),
            root_children: Vec::new(),
        }
    }

    fn convert(mut self, markdown: &str, options: &MarkdownOptions) -> Document {
        for event in Parser::new_ext(markdown, options.to_pulldown_options()) {
            self.handle_event(event);
        }
        // Unbalanced input cannot happen with pulldown-cmark, but never drop content.
        while !self.stack.is_empty() {
            self.end_tag();
        }
        Document::new(self.root_children)
    }

    fn handle_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(_) => self.end_tag(),
            Event::Text(text) => self.add_text(&text),
            Event::Code(code) => self.add_node(Node::InlineCode(code.into_string())),
            Event::Html(html) | Event::InlineHtml(html) => {
                self.add_node(Node::Html(html.into_string()))
            }
            Event::SoftBreak => self.add_node(Node::SoftBreak),
            Event::HardBreak => self.add_node(Node::HardBreak),
            Event::Rule => self.add_node(Node::Rule),
            Event::FootnoteReference(label) => {
                self.add_node(Node::FootnoteReference(label.into_string()))
            }
            Event::TaskListMarker(checked) => self.add_node(Node::TaskMarker(checked)),
            Event::InlineMath(tex) => self.add_node(Node::Math(Math {
                display: false,
                tex: tex.into_string(),
            })),
            Event::DisplayMath(tex) => self.add_node(Node::Math(Math {
                display: true,
                tex: tex.into_string(),
            })),
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        let open = match tag {
            Tag::Paragraph => Open::Paragraph,
            Tag::Heading {
                level, id, classes, ..
            } => Open::Heading {
                level: heading_level(level),
                id: id.map(|id| id.into_string()),
                classes: classes.into_iter().map(|c| c.into_string()).collect(),
            },
            Tag::BlockQuote(_) => Open::BlockQuote,
            Tag::CodeBlock(CodeBlockKind::Fenced(info)) => {
                let (lang, title) = parse_info(&info);
                Open::Code { lang, title }
            }
            Tag::CodeBlock(CodeBlockKind::Indented) => Open::Code {
                lang: None,
                title: None,
            },
            Tag::HtmlBlock => Open::HtmlBlock,
            Tag::List(start) => Open::List(start),
            Tag::Item => Open::Item,
            Tag::FootnoteDefinition(label) => Open::Footnote(label.into_string()),
            Tag::Table(alignments) => Open::Table(alignments.into_iter().map(align).collect()),
            Tag::TableHead => Open::TableHead,
            Tag::TableRow => Open::TableRow,
            Tag::TableCell => Open::TableCell,
            Tag::Emphasis => Open::Emphasis,
            Tag::Strong => Open::Strong,
            Tag::Strikethrough => Open::Strikethrough,
            Tag::Link {
                dest_url, title, ..
            } => Open::Link {
                url: dest_url.into_string(),
                title: title.into_string(),
            },
            Tag::Image {
                dest_url, title, ..
            } => Open::Image {
                src: dest_url.into_string(),
                title: title.into_string(),
            },
            Tag::MetadataBlock(_)
            | Tag::DefinitionList
            | Tag::DefinitionListTitle
            | Tag::DefinitionListDefinition
            | Tag::Superscript
            | Tag::Subscript => Open::Transparent,
        };
        self.stack.push(StackFrame {
            open,
            children: Vec::new(),
        });
    }

    fn end_tag(&mut self) {
        let Some(StackFrame { open, children }) = self.stack.pop() else {
            return;
        };

        let node = match open {
            Open::Paragraph => Node::Paragraph(children),
            Open::Heading { level, id, classes } => Node::Heading(Heading {
                level,
                id,
                classes,
                children,
            }),
            Open::BlockQuote => Node::BlockQuote(children),
            Open::List(start) => Node::List {
                start,
                items: children,
            },
            Open::Item => Node::Item(children),
            Open::Code { lang, title } => Node::Code(CodeBlock {
                lang,
                title,
                source: concat_text(&children),
            }),
            Open::HtmlBlock => Node::Html(
                children
                    .into_iter()
                    .filter_map(|n| match n {
                        Node::Html(s) | Node::Text(s) => Some(s),
                        _ => None,
                    })
                    .collect(),
            ),
            Open::Table(align) => Node::Table {
                align,
                rows: children,
            },
            Open::TableHead => Node::TableHead(children),
            Open::TableRow => Node::TableRow(children),
            Open::TableCell => Node::TableCell(children),
            Open::Footnote(label) => Node::FootnoteDefinition { label, children },
            Open::Emphasis => Node::Emphasis(children),
            Open::Strong => Node::Strong(children),
            Open::Strikethrough => Node::Strikethrough(children),
            Open::Link { url, title } => Node::Link {
                url,
                title,
                children,
            },
            Open::Image { src, title } => Node::Image(Image {
                src,
                title,
                alt: concat_text(&children),
            }),
            Open::Transparent => {
                for child in children {
                    self.add_node(child);
                }
                return;
            }
        };
        self.add_node(node);
    }

    /// Adjacent text events are merged into one node.
    fn add_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let siblings = self.current();
        if let Some(Node::Text(prev)) = siblings.last_mut() {
            prev.push_str(text);
        } else {
            siblings.push(Node::Text(text.to_string()));
        }
    }

    fn add_node(&mut self, node: Node) {
        self.current().push(node);
    }

    fn current(&mut self) -> &mut Vec<Node> {
        match self.stack.last_mut() {
            Some(frame) => &mut frame.children,
            None => &mut self.root_children,
        }
    }
}

fn concat_text(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        node.push_text(&mut out);
    }
    out
}

/// Split a fence info string into language and optional title.
///
/// `js:src/app.js` → (`js`, `src/app.js`); extra words after the first are ignored.
fn parse_info(info: &str) -> (Option<String>, Option<String>) {
    let first = info.split_whitespace().next().unwrap_or("");
    let (lang, title) = match first.split_once(':') {
        Some((lang, title)) => (lang, Some(title)),
        None => (first, None),
    };
    let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
    (non_empty(lang), title.and_then(non_empty))
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn align(alignment: Alignment) -> Align {
    match alignment {
        Alignment::None => Align::None,
        Alignment::Left => Align::Left,
        Alignment::Center => Align::Center,
        Alignment::Right => Align::Right,
    }
}

/// Convert a markdown body to a document tree.
pub fn from_markdown(markdown: &str, options: &MarkdownOptions) -> Document {
    MarkdownConverter::new().convert(markdown, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(md: &str) -> Document {
        from_markdown(md, &MarkdownOptions::default())
    }

    #[test]
    fn test_paragraph_and_inlines() {
        let doc = parse("Hello *big* `world`");
        assert_eq!(
            doc.children,
            vec![Node::Paragraph(vec![
                Node::Text("Hello ".into()),
                Node::Emphasis(vec![Node::Text("big".into())]),
                Node::Text(" ".into()),
                Node::InlineCode("world".into()),
            ])]
        );
    }

    #[test]
    fn test_heading_with_explicit_id() {
        let doc = parse("## Intro {#start .lead}");
        let Node::Heading(h) = &doc.children[0] else {
            panic!("expected heading, got {:?}", doc.children[0]);
        };
        assert_eq!(h.level, 2);
        assert_eq!(h.id.as_deref(), Some("start"));
        assert_eq!(h.classes, vec!["lead"]);
        assert_eq!(doc.children[0].text().trim(), "Intro");
    }

    #[test]
    fn test_code_block_with_title() {
        let doc = parse("```js:src/app.js\nlet a = 1;\n```\n");
        assert_eq!(
            doc.children,
            vec![Node::Code(CodeBlock {
                lang: Some("js".into()),
                title: Some("src/app.js".into()),
                source: "let a = 1;\n".into(),
            })]
        );
    }

    #[test]
    fn test_indented_code_has_no_lang() {
        let doc = parse("    plain code\n");
        assert!(matches!(&doc.children[0], Node::Code(c) if c.lang.is_none() && c.source == "plain code\n"));
    }

    #[test]
    fn test_image_alt_from_children() {
        let doc = parse("![A *fancy* cat](/cat.png \"Cat\")");
        assert_eq!(
            doc.children,
            vec![Node::Paragraph(vec![Node::Image(Image {
                src: "/cat.png".into(),
                title: "Cat".into(),
                alt: "A fancy cat".into(),
            })])]
        );
    }

    #[test]
    fn test_math_nodes() {
        let doc = parse("Euler $e^{i\\pi}$\n\n$$\nx^2\n$$\n");
        let mut math = Vec::new();
        doc.walk(&mut |n| {
            if let Node::Math(m) = n {
                math.push((m.display, m.tex.trim().to_string()));
            }
        });
        assert_eq!(
            math,
            vec![(false, "e^{i\\pi}".to_string()), (true, "x^2".to_string())]
        );
    }

    #[test]
    fn test_html_block_passthrough() {
        let doc = parse("<Chart data={points} />\n\ntext");
        assert!(matches!(&doc.children[0], Node::Html(h) if h.contains("<Chart")));
    }

    #[test]
    fn test_table_and_tasks() {
        let doc = parse("| a | b |\n|:--|--:|\n| 1 | 2 |\n\n- [x] done\n");
        assert!(matches!(
            &doc.children[0],
            Node::Table { align, .. } if align == &[Align::Left, Align::Right]
        ));
        let mut checked = None;
        doc.walk(&mut |n| {
            if let Node::TaskMarker(c) = n {
                checked = Some(*c);
            }
        });
        assert_eq!(checked, Some(true));
    }

    #[test]
    fn test_parse_info() {
        assert_eq!(parse_info("rust"), (Some("rust".into()), None));
        assert_eq!(parse_info("js:a.js"), (Some("js".into()), Some("a.js".into())));
        assert_eq!(parse_info("rust ignore"), (Some("rust".into()), None));
        assert_eq!(parse_info(":a.txt"), (None, Some("a.txt".into())));
        assert_eq!(parse_info(""), (None, None));
    }
}

//! HTML serialization of a transformed [`Document`].
//!
//! Produces the payload handed to the front end: the HTML body plus a table
//! of contents built from heading ids.

use std::fmt::{self, Write};

use serde::Serialize;

use super::tree::{Align, Component, Document, Heading, Highlighted, Node};
use crate::utils::html::{escape, escape_attr};

/// Class on the self-link span inside headings.
const ANCHOR_ICON_CLASS: &str = "icon icon-link";
/// Class on the title bar above a titled code block.
const CODE_TITLE_CLASS: &str = "remark-code-title";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    pub level: u8,
    pub id: String,
    pub text: String,
}

/// Serialized output of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payload {
    pub html: String,
    pub toc: Vec<TocEntry>,
}

/// Serialize `doc` to HTML and collect its table of contents.
pub fn render(doc: &Document) -> Result<Payload, fmt::Error> {
    let mut out = String::new();
    render_nodes(&mut out, &doc.children)?;
    Ok(Payload {
        html: out,
        toc: toc(doc),
    })
}

/// Headings that carry an id, in document order.
pub fn toc(doc: &Document) -> Vec<TocEntry> {
    let mut entries = Vec::new();
    doc.walk(&mut |node| {
        if let Node::Heading(Heading {
            level,
            id: Some(id),
            children,
            ..
        }) = node
        {
            let mut text = String::new();
            children.iter().for_each(|n| n.push_text(&mut text));
            entries.push(TocEntry {
                level: *level,
                id: id.clone(),
                text: text.trim().to_string(),
            });
        }
    });
    entries
}

fn render_nodes(out: &mut String, nodes: &[Node]) -> fmt::Result {
    nodes.iter().try_for_each(|n| render_node(out, n))
}

fn wrap(out: &mut String, tag: &str, children: &[Node]) -> fmt::Result {
    write!(out, "<{tag}>")?;
    render_nodes(out, children)?;
    write!(out, "</{tag}>")
}

fn render_node(out: &mut String, node: &Node) -> fmt::Result {
    match node {
        Node::Paragraph(c) => {
            wrap(out, "p", c)?;
            out.push('\n');
        }
        Node::Heading(h) => {
            write!(out, "<h{}", h.level)?;
            if let Some(id) = &h.id {
                write!(out, r#" id="{}""#, escape_attr(id))?;
            }
            if !h.classes.is_empty() {
                write!(out, r#" class="{}""#, escape_attr(&h.classes.join(" ")))?;
            }
            out.push('>');
            render_nodes(out, &h.children)?;
            writeln!(out, "</h{}>", h.level)?;
        }
        Node::BlockQuote(c) => {
            out.push_str("<blockquote>\n");
            render_nodes(out, c)?;
            out.push_str("</blockquote>\n");
        }
        Node::List { start, items } => {
            let tag = match start {
                Some(1) => {
                    out.push_str("<ol>\n");
                    "ol"
                }
                Some(n) => {
                    writeln!(out, r#"<ol start="{n}">"#)?;
                    "ol"
                }
                None => {
                    out.push_str("<ul>\n");
                    "ul"
                }
            };
            render_nodes(out, items)?;
            writeln!(out, "</{tag}>")?;
        }
        Node::Item(c) => {
            wrap(out, "li", c)?;
            out.push('\n');
        }
        Node::Code(code) => {
            render_code_title(out, code.title.as_deref())?;
            out.push_str("<pre>");
            render_code_open(out, code.lang.as_deref())?;
            out.push_str(&escape(&code.source));
            out.push_str("</code></pre>\n");
        }
        Node::Highlighted(code) => render_highlighted(out, code)?,
        Node::Table { align, rows } => render_table(out, align, rows)?,
        Node::TableHead(c) | Node::TableRow(c) => {
            wrap(out, "tr", c)?;
        }
        Node::TableCell(c) => wrap(out, "td", c)?,
        Node::FootnoteDefinition { label, children } => {
            let label = escape_attr(label);
            write!(
                out,
                r#"<div class="footnote-definition" id="fn-{label}"><sup class="footnote-definition-label">{label}</sup>"#
            )?;
            render_nodes(out, children)?;
            out.push_str("</div>\n");
        }
        Node::Rule => out.push_str("<hr />\n"),
        Node::Html(html) => out.push_str(html),

        Node::Text(t) => out.push_str(&escape(t)),
        Node::Emphasis(c) => wrap(out, "em", c)?,
        Node::Strong(c) => wrap(out, "strong", c)?,
        Node::Strikethrough(c) => wrap(out, "del", c)?,
        Node::Link {
            url,
            title,
            children,
        } => {
            write!(out, r#"<a href="{}""#, escape_attr(url))?;
            if !title.is_empty() {
                write!(out, r#" title="{}""#, escape_attr(title))?;
            }
            out.push('>');
            render_nodes(out, children)?;
            out.push_str("</a>");
        }
        Node::Image(img) => {
            write!(
                out,
                r#"<img src="{}" alt="{}""#,
                escape_attr(&img.src),
                escape_attr(&img.alt)
            )?;
            if !img.title.is_empty() {
                write!(out, r#" title="{}""#, escape_attr(&img.title))?;
            }
            out.push_str(" />");
        }
        Node::InlineCode(code) => write!(out, "<code>{}</code>", escape(code))?,
        Node::SoftBreak => out.push('\n'),
        Node::HardBreak => out.push_str("<br />\n"),
        Node::FootnoteReference(label) => {
            let label = escape_attr(label);
            write!(
                out,
                r##"<sup class="footnote-reference"><a href="#fn-{label}">{label}</a></sup>"##
            )?;
        }
        Node::TaskMarker(checked) => {
            let checked = if *checked { " checked=\"\"" } else { "" };
            write!(out, r#"<input disabled="" type="checkbox"{checked} />"#)?;
        }
        // Math that never went through lowering keeps its source delimiters.
        Node::Math(math) => {
            let delim = if math.display { "$$" } else { "$" };
            write!(out, "{delim}{}{delim}", escape(&math.tex))?;
        }
        Node::Component(component) => render_component(out, component)?,
        Node::Anchor(id) => write!(
            out,
            r##"<a aria-hidden="true" tabindex="-1" href="#{}"><span class="{ANCHOR_ICON_CLASS}"></span></a>"##,
            escape_attr(id)
        )?,
    }
    Ok(())
}

fn render_code_title(out: &mut String, title: Option<&str>) -> fmt::Result {
    match title {
        Some(title) => writeln!(
            out,
            r#"<div class="{CODE_TITLE_CLASS}">{}</div>"#,
            escape(title)
        ),
        None => Ok(()),
    }
}

fn render_code_open(out: &mut String, lang: Option<&str>) -> fmt::Result {
    match lang {
        Some(lang) => write!(out, r#"<code class="language-{}">"#, escape_attr(lang)),
        None => write!(out, "<code>"),
    }
}

fn render_highlighted(out: &mut String, code: &Highlighted) -> fmt::Result {
    render_code_title(out, code.title.as_deref())?;
    match code.lang.as_deref() {
        Some(lang) => write!(out, r#"<pre class="language-{}">"#, escape_attr(lang))?,
        None => out.push_str("<pre>"),
    }
    render_code_open(out, code.lang.as_deref())?;
    for token in &code.tokens {
        match &token.class {
            Some(class) => write!(
                out,
                r#"<span class="{}">{}</span>"#,
                escape_attr(class),
                escape(&token.text)
            )?,
            None => out.push_str(&escape(&token.text)),
        }
    }
    out.push_str("</code></pre>\n");
    Ok(())
}

fn render_table(out: &mut String, align: &[Align], rows: &[Node]) -> fmt::Result {
    out.push_str("<table>\n");
    let mut body_open = false;
    for row in rows {
        let (cells, cell_tag) = match row {
            Node::TableHead(cells) => {
                out.push_str("<thead>");
                (cells, "th")
            }
            Node::TableRow(cells) => {
                if !body_open {
                    out.push_str("<tbody>\n");
                    body_open = true;
                }
                (cells, "td")
            }
            other => {
                render_node(out, other)?;
                continue;
            }
        };

        out.push_str("<tr>");
        for (i, cell) in cells.iter().enumerate() {
            let children = match cell {
                Node::TableCell(c) => c.as_slice(),
                other => std::slice::from_ref(other),
            };
            write!(out, "<{cell_tag}")?;
            if let Some(a) = align.get(i).and_then(|a| a.as_str()) {
                write!(out, r#" style="text-align: {a}""#)?;
            }
            out.push('>');
            render_nodes(out, children)?;
            write!(out, "</{cell_tag}>")?;
        }
        out.push_str("</tr>");
        if matches!(row, Node::TableHead(_)) {
            out.push_str("</thead>");
        }
        out.push('\n');
    }
    if body_open {
        out.push_str("</tbody>\n");
    }
    out.push_str("</table>\n");
    Ok(())
}

fn render_component(out: &mut String, component: &Component) -> fmt::Result {
    match component {
        Component::Image {
            alt,
            src,
            title,
            width,
            height,
        } => {
            write!(
                out,
                r#"<div data-component="image"><img src="{}" alt="{}" width="{width}" height="{height}""#,
                escape_attr(src),
                escape_attr(alt),
            )?;
            if !title.is_empty() {
                write!(out, r#" title="{}""#, escape_attr(title))?;
            }
            out.push_str(r#" loading="lazy" decoding="async" /></div>"#);
            out.push('\n');
        }
    }
    Ok(())
}

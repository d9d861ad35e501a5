use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};

use crate::error::{ParseError, Result};

static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Containers tried in order when locating the article body.
const ARTICLE_SELECTORS: &[&str] = &["article", "div[role=\"main\"]", "main"];

/// Class names that mark a `div` as a highlighted code block.
const CODE_CLASSES: &[&str] = &["highlight", "codehilite"];

/// Inline content of a paragraph, tagged by emphasis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    /// Bold or strong text.
    Label(String),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph { text: String, inlines: Vec<Inline> },
    Code(String),
    Separator,
    /// Lists, tables, admonitions: kept for their text only.
    Other(String),
}

impl Block {
    pub fn text(&self) -> &str {
        match self {
            Block::Heading { text, .. } | Block::Paragraph { text, .. } => text,
            Block::Code(code) => code,
            Block::Other(text) => text,
            Block::Separator => "",
        }
    }

    pub fn is_code(&self) -> bool {
        matches!(self, Block::Code(_))
    }
}

/// Parse an HTML document and flatten the direct children of its article
/// element into blocks, in document order.
pub fn classify_html(html: &str) -> Result<Vec<Block>> {
    let doc = Html::parse_document(html);
    let article = find_article(&doc)?;
    let blocks: Vec<Block> = article
        .children()
        .filter_map(ElementRef::wrap)
        .map(classify_element)
        .collect();
    if blocks.is_empty() {
        return Err(ParseError::Segmentation("article element is empty".into()));
    }
    Ok(blocks)
}

fn find_article(doc: &Html) -> Result<ElementRef<'_>> {
    for css in ARTICLE_SELECTORS {
        let selector = Selector::parse(css).map_err(|_| ParseError::Assertion("article selector is valid"))?;
        if let Some(el) = doc.select(&selector).next() {
            return Ok(el);
        }
    }
    Err(ParseError::Segmentation("no article element found".into()))
}

fn classify_element(el: ElementRef<'_>) -> Block {
    let name = el.value().name();
    match name {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => Block::Heading {
            level: name[1..].parse().unwrap_or(6),
            text: heading_text(el),
        },
        "hr" => Block::Separator,
        "pre" => Block::Code(code_text(el)),
        "div" if el.value().classes().any(|c| CODE_CLASSES.contains(&c)) => Block::Code(code_text(el)),
        "p" => {
            let inlines = inline_nodes(el);
            let text = collapse_ws(&el.text().collect::<String>());
            Block::Paragraph { text, inlines }
        }
        _ => Block::Other(collapse_ws(&el.text().collect::<String>())),
    }
}

/// Heading text without permalink anchors (`<a class="headerlink">¶</a>`).
fn heading_text(el: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in el.descendants() {
        if let Node::Text(t) = node.value() {
            let in_anchor = node
                .ancestors()
                .filter_map(ElementRef::wrap)
                .any(|a| a.value().classes().any(|c| c == "headerlink"));
            if !in_anchor {
                out.push_str(t);
            }
        }
    }
    collapse_ws(out.trim_end_matches('¶'))
}

fn code_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim_end().to_string()
}

fn inline_nodes(el: ElementRef<'_>) -> Vec<Inline> {
    let mut inlines = Vec::new();
    for child in el.children() {
        match child.value() {
            Node::Text(t) => inlines.push(Inline::Text(collapse_ws(t))),
            Node::Element(e) => {
                let Some(child_el) = ElementRef::wrap(child) else {
                    continue;
                };
                let text = collapse_ws(&child_el.text().collect::<String>());
                if matches!(e.name(), "strong" | "b") {
                    inlines.push(Inline::Label(text));
                } else {
                    inlines.push(Inline::Text(text));
                }
            }
            _ => {}
        }
    }
    inlines
}

fn collapse_ws(s: &str) -> String {
    WS_RE.replace_all(s, " ").trim().to_string()
}

//! Serializes an [`Article`] into TypeScript declaration text.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{Article, Method, Parameter, Property, CONSTRUCTOR_SENTINEL};

pub const WRAP_WIDTH: usize = 80;
const INDENT: &str = "    ";

static INLINE_COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*/\*.*?\*/").unwrap());

pub fn render(article: &Article) -> String {
    let mut builder = DeclarationBuilder::default();
    builder.article(article);
    builder.finish()
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DocLine {
    Prose(String),
    /// Emitted verbatim, one comment line per source line.
    Code(String),
    Blank,
}

/// Line buffer for one article. Consumed by [`DeclarationBuilder::finish`].
#[derive(Debug, Default)]
pub struct DeclarationBuilder {
    lines: Vec<String>,
    indent: usize,
}

impl DeclarationBuilder {
    pub fn article(&mut self, article: &Article) {
        let class = &article.class;
        let mut doc = Vec::new();
        paragraphs(&mut doc, class.description.split("\n\n").filter(|p| !p.trim().is_empty()), false);
        self.doc_comment(&doc);

        if class.name.starts_with(|c: char| c.is_uppercase()) {
            self.line(&format!("export declare class {} {{", class.name));
        } else {
            self.line(&format!("export declare var {}: {{", class.name));
        }

        self.indent += 1;
        for (i, property) in article.properties.iter().enumerate() {
            if i > 0 {
                self.blank();
            }
            self.property(property);
        }
        if !article.properties.is_empty() && !article.methods.is_empty() {
            self.blank();
        }
        for (i, method) in article.methods.iter().enumerate() {
            if i > 0 {
                self.blank();
            }
            self.method(method);
        }
        self.indent -= 1;

        self.line("}");
    }

    fn property(&mut self, property: &Property) {
        let mut doc = Vec::new();
        paragraphs(&mut doc, property.description.iter().map(String::as_str), true);
        for example in &property.examples {
            if !doc.is_empty() {
                doc.push(DocLine::Blank);
            }
            doc.push(DocLine::Prose("@example".into()));
            doc.push(DocLine::Code(example.clone()));
        }
        self.doc_comment(&doc);

        let sig = &property.signature;
        self.line(&format!("{} {}: {};", property.modifiers.join(" "), sig.name, sig.ty));
    }

    fn method(&mut self, method: &Method) {
        let sig = &method.signature;

        let mut doc = Vec::new();
        paragraphs(&mut doc, method.description.iter().map(String::as_str), true);
        let has_tags = !sig.parameters.is_empty() || method.return_description.is_some();
        if !doc.is_empty() && has_tags {
            doc.push(DocLine::Blank);
        }
        for param in &sig.parameters {
            doc.push(DocLine::Prose(param_tag(param)));
        }
        if let Some(ret) = &method.return_description {
            doc.push(DocLine::Prose(format!("@returns {ret}")));
        }
        self.doc_comment(&doc);

        let params = sig
            .parameters
            .iter()
            .map(|p| format!("{}: {}", p.name, p.ty))
            .collect::<Vec<_>>()
            .join(", ");

        if sig.is_constructor() {
            let rest: Vec<&str> = sig
                .modifiers
                .iter()
                .map(String::as_str)
                .filter(|m| *m != CONSTRUCTOR_SENTINEL)
                .collect();
            self.line(&format!("{}constructor({params});", prefix(&rest)));
        } else {
            let mods: Vec<&str> = sig.modifiers.iter().map(String::as_str).collect();
            let ret = sig.return_type.as_deref().unwrap_or("void");
            self.line(&format!("{}{}({params}): {ret};", prefix(&mods), sig.name));
        }
    }

    fn doc_comment(&mut self, doc: &[DocLine]) {
        if doc.is_empty() {
            return;
        }
        self.line("/**");
        for entry in doc {
            match entry {
                DocLine::Blank => self.line(" *"),
                DocLine::Prose(text) => {
                    for wrapped in wrap(&escape_comment(text), WRAP_WIDTH) {
                        self.line(&format!(" * {wrapped}"));
                    }
                }
                DocLine::Code(code) => {
                    for code_line in escape_comment(code).lines() {
                        let code_line = code_line.trim_end();
                        if code_line.is_empty() {
                            self.line(" *");
                        } else {
                            self.line(&format!(" * {code_line}"));
                        }
                    }
                }
            }
        }
        self.line(" */");
    }

    fn line(&mut self, text: &str) {
        self.lines.push(format!("{}{}", INDENT.repeat(self.indent), text));
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    pub fn finish(self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}

/// Description paragraphs separated by blank lines. With `tag_deprecated`,
/// each deprecation notice is preceded by an `@deprecated` tag.
fn paragraphs<'a>(doc: &mut Vec<DocLine>, paras: impl Iterator<Item = &'a str>, tag_deprecated: bool) {
    for (i, para) in paras.enumerate() {
        if i > 0 {
            doc.push(DocLine::Blank);
        }
        if tag_deprecated && para.to_lowercase().contains("deprecated") {
            doc.push(DocLine::Prose("@deprecated".into()));
        }
        doc.push(DocLine::Prose(para.trim().to_string()));
    }
}

fn param_tag(param: &Parameter) -> String {
    // Review markers are block comments and would close the doc comment.
    let ty = INLINE_COMMENT_RE.replace_all(&param.ty, "");
    match param.description.as_deref() {
        Some(desc) if !desc.is_empty() => format!("@param {} {{{}}} - {}", param.name, ty, desc),
        _ => format!("@param {} {{{}}}", param.name, ty),
    }
}

fn prefix(modifiers: &[&str]) -> String {
    if modifiers.is_empty() {
        String::new()
    } else {
        format!("{} ", modifiers.join(" "))
    }
}

fn escape_comment(text: &str) -> String {
    text.replace("*/", "*\\/")
}

/// Greedy word wrap. Lines break on whitespace only, so a single word longer
/// than `width` stays on its own line.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= width {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

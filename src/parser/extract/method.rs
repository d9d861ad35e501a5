use tracing::debug;

use crate::error::{ParseError, Result};
use crate::model::Method;
use crate::parser::blocks::{Block, Inline};
use crate::parser::sections::Section;
use crate::parser::signature;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Method,
    Parameters,
    Return,
}

fn phase_for(subheading: &str) -> Option<Phase> {
    let lower = subheading.to_lowercase();
    if lower.contains("parameters") {
        Some(Phase::Parameters)
    } else if lower.contains("return") {
        Some(Phase::Return)
    } else {
        None
    }
}

/// Label inline → name, the remaining text → description.
fn parameter_entry(inlines: &[Inline]) -> Option<(String, String)> {
    let mut name = None;
    let mut parts = Vec::new();
    for inline in inlines {
        match inline {
            Inline::Label(label) if name.is_none() && !label.is_empty() => name = Some(label.clone()),
            Inline::Label(text) | Inline::Text(text) if !text.is_empty() => parts.push(text.as_str()),
            _ => {}
        }
    }
    name.map(|n| (n, parts.join(" ")))
}

fn text_content(inlines: &[Inline]) -> Vec<&str> {
    inlines
        .iter()
        .filter_map(|i| match i {
            Inline::Text(t) if !t.is_empty() => Some(t.as_str()),
            _ => None,
        })
        .collect()
}

pub fn extract(section: &Section) -> Result<Method> {
    let (_, heading) = section.heading().ok_or(ParseError::Assertion("method section has heading"))?;

    let mut phase = Phase::Method;
    let mut description = Vec::new();
    let mut code_blocks: Vec<&str> = Vec::new();
    let mut param_docs: Vec<(String, String)> = Vec::new();
    let mut return_parts: Vec<&str> = Vec::new();

    for block in section.body() {
        if let Block::Heading { level: 3, text } = block {
            if let Some(next) = phase_for(text) {
                phase = next;
            }
            continue;
        }

        match (phase, block) {
            (Phase::Method, Block::Code(code)) => code_blocks.push(code),
            (Phase::Method, Block::Paragraph { .. } | Block::Other(_)) => {
                let text = block.text().trim();
                if !text.is_empty() {
                    description.push(text.to_string());
                }
            }
            (Phase::Parameters, Block::Paragraph { inlines, .. }) => match parameter_entry(inlines) {
                Some(entry) => param_docs.push(entry),
                None => debug!("{}: parameter paragraph without a name", heading),
            },
            (Phase::Return, Block::Paragraph { inlines, .. }) => return_parts.extend(text_content(inlines)),
            _ => {}
        }
    }

    let first = code_blocks
        .first()
        .ok_or_else(|| ParseError::MissingSignatureCodeBlock(heading.to_string()))?;
    let mut signature = signature::parse_method(first)?;

    for param in &mut signature.parameters {
        let key = param.name.trim_end_matches('?');
        param.description = param_docs
            .iter()
            .find(|(name, _)| name.trim_end_matches('?') == key)
            .map(|(_, doc)| doc.clone())
            .filter(|doc| !doc.is_empty());
    }

    let return_description = Some(return_parts.join(" ")).filter(|d| !d.is_empty());

    Ok(Method { signature, description, return_description })
}

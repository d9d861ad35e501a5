use crate::error::{ParseError, Result};
use crate::model::Property;
use crate::parser::blocks::Block;
use crate::parser::sections::Section;
use crate::parser::signature;

const READ_ONLY_MARKER: &str = "read-only";

pub fn extract(section: &Section) -> Result<Property> {
    let (_, heading) = section.heading().ok_or(ParseError::Assertion("property section has heading"))?;
    let body = section.body();

    // Code blocks with no prose after them are signature candidates.
    let trailing_start = body
        .iter()
        .rposition(|b| !b.is_code())
        .map_or(0, |i| i + 1);

    let mut modifiers = vec!["public".to_string()];
    let mut description = Vec::new();
    let mut examples = Vec::new();
    let mut signature_block: Option<&str> = None;

    for (i, block) in body.iter().enumerate() {
        match block {
            Block::Code(code) if i >= trailing_start => {
                if signature_block.is_some() {
                    return Err(ParseError::DuplicateSignature(heading.to_string()));
                }
                signature_block = Some(code.as_str());
            }
            Block::Code(code) => {
                let code = code.trim();
                if !code.is_empty() {
                    examples.push(code.to_string());
                }
            }
            Block::Heading { .. } | Block::Separator => {}
            Block::Paragraph { .. } | Block::Other(_) => {
                let text = block.text().trim();
                if text.to_lowercase().starts_with(READ_ONLY_MARKER) {
                    if !modifiers.iter().any(|m| m == "readonly") {
                        modifiers.push("readonly".to_string());
                    }
                } else if !text.is_empty() {
                    description.push(text.to_string());
                }
            }
        }
    }

    let code = signature_block.ok_or_else(|| ParseError::MissingSignature(heading.to_string()))?;
    let signature = signature::parse_property(code)?;

    Ok(Property { signature, modifiers, examples, description })
}

use crate::error::{ParseError, Result};
use crate::model::Class;
use crate::parser::blocks::Block;
use crate::parser::sections::Section;

pub fn extract(section: &Section) -> Result<Class> {
    let (_, name) = section.heading().ok_or(ParseError::Assertion("class section has heading"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(ParseError::Assertion("class name is non-empty"));
    }

    let paragraphs: Vec<&str> = section
        .body()
        .iter()
        .filter(|b| !matches!(b, Block::Heading { .. } | Block::Separator))
        .map(|b| b.text().trim())
        .filter(|t| !t.is_empty())
        .collect();

    Ok(Class { name: name.to_string(), description: paragraphs.join("\n\n") })
}

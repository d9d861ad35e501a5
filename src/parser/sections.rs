use super::blocks::Block;
use crate::error::{ParseError, Result};

/// Heading glyphs the docs put in front of method names.
pub const METHOD_PREFIXES: &[char] = &['-', '+'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Class,
    Property,
    Method,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub blocks: Vec<Block>,
}

impl Section {
    pub fn heading(&self) -> Option<(u8, &str)> {
        match self.blocks.first() {
            Some(Block::Heading { level, text }) => Some((*level, text.as_str())),
            _ => None,
        }
    }

    /// Everything after the heading.
    pub fn body(&self) -> &[Block] {
        self.blocks.get(1..).unwrap_or_default()
    }
}

/// Split article blocks into one section per H1/H2 heading.
pub fn segment(blocks: &[Block]) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current: Vec<Block> = Vec::new();

    for block in blocks {
        match block {
            Block::Separator => continue,
            Block::Heading { level: 1 | 2, .. } => {
                if !current.is_empty() {
                    sections.push(Section { blocks: std::mem::take(&mut current) });
                }
            }
            _ => {}
        }
        current.push(block.clone());
    }

    if !current.is_empty() {
        sections.push(Section { blocks: current });
    }

    sections
}

/// Decides which parser a section goes to.
pub trait SectionClassifier {
    fn classify(&self, section: &Section) -> Result<SectionKind>;
}

/// Heading-glyph convention of the documentation site.
#[derive(Debug, Default, Clone, Copy)]
pub struct GlyphClassifier;

impl SectionClassifier for GlyphClassifier {
    fn classify(&self, section: &Section) -> Result<SectionKind> {
        match section.heading() {
            Some((1, _)) => Ok(SectionKind::Class),
            Some((2, text)) if text.starts_with(METHOD_PREFIXES) => Ok(SectionKind::Method),
            Some((2, _)) => Ok(SectionKind::Property),
            Some((level, text)) => Err(ParseError::Classification(format!(
                "section opens with an h{level} heading: {text:?}"
            ))),
            None => Err(ParseError::Classification(format!(
                "section does not open with a heading: {:?}",
                section.blocks.first().map(Block::text).unwrap_or_default()
            ))),
        }
    }
}

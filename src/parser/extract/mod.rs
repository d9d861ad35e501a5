pub mod class;
pub mod method;
pub mod property;

use super::sections::{Section, SectionClassifier, SectionKind};
use crate::error::{ParseError, Result};
use crate::model::Article;

/// Route every section to its parser and assemble the article, keeping
/// source order for properties and methods.
pub fn extract_all(sections: &[Section], classifier: &dyn SectionClassifier) -> Result<Article> {
    let mut class = None;
    let mut properties = Vec::new();
    let mut methods = Vec::new();

    for section in sections {
        match classifier.classify(section)? {
            SectionKind::Class => {
                if class.is_some() {
                    return Err(ParseError::Classification("more than one class section".into()));
                }
                class = Some(class::extract(section)?);
            }
            SectionKind::Property => properties.push(property::extract(section)?),
            SectionKind::Method => methods.push(method::extract(section)?),
        }
    }

    let class = class.ok_or_else(|| ParseError::Classification("no class section".into()))?;
    Ok(Article { class, properties, methods })
}

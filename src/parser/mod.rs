pub mod blocks;
pub mod extract;
pub mod sections;
pub mod signature;
pub mod types;

use crate::emit;
use crate::error::{ParseError, Result};
use crate::model::Article;
use crate::output;
use sections::GlyphClassifier;

/// One generated declaration file, not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub class_name: String,
    pub file_name: String,
    pub content: String,
}

/// html → blocks → sections → article.
pub fn parse_article(html: &str) -> Result<Article> {
    let blocks = blocks::classify_html(html)?;
    let sections = sections::segment(&blocks);
    if sections.is_empty() {
        return Err(ParseError::Segmentation("article has no sections".into()));
    }
    extract::extract_all(&sections, &GlyphClassifier)
}

/// Parse and render one article page.
pub fn process_article(html: &str) -> Result<Declaration> {
    let article = parse_article(html)?;
    let file_name = output::file_name(&article.class.name)
        .ok_or(ParseError::Assertion("class name yields a file name"))?;
    let content = emit::render(&article);
    Ok(Declaration { class_name: article.class.name, file_name, content })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const ALERT_DTS: &str = "\
/**
 * Presents an alert.
 *
 * Use this to configure an alert presented modally or as a sheet. After
 * configuring the alert, call presentAlert() or presentSheet() to present the
 * alert.
 */
export declare class Alert {
    /**
     * Title displayed in the alert. Usually a short string.
     */
    public title: string;

    /**
     * @deprecated
     * Titles of the actions added so far. This property is deprecated, use addAction()
     * instead.
     *
     * The list preserves insertion order.
     *
     * @example
     * let alert = new Alert()
     * alert.addAction(\"OK\")
     * log(alert.actions)
     */
    public readonly actions: string[];

    /**
     * Constructs a new alert.
     */
    constructor();

    /**
     * Adds an action to the alert.
     *
     * @param title {string} - string Title of the action.
     * @param isDestructive {boolean} - bool
     */
    addAction(title: string, isDestructive: boolean): void;

    /**
     * Presents the alert modally.
     *
     * @returns Promise<number> A promise carrying the selected action index.
     */
    presentAlert(): Promise<number>;

    /**
     * Dismisses the alert.
     */
    static dismiss(): Promise<void> /* REVIEW: unspecified promise result */;
}
";

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{name}")).unwrap()
    }

    #[test]
    fn alert_fixture_end_to_end() {
        let decl = process_article(&fixture("alert.html")).unwrap();
        assert_eq!(decl.class_name, "Alert");
        assert_eq!(decl.file_name, "alert.d.ts");
        assert_eq!(decl.content, ALERT_DTS);
    }

    #[test]
    fn alert_fixture_model() {
        let html = fixture("alert.html");
        let article = parse_article(&html).unwrap();
        let sections = sections::segment(&blocks::classify_html(&html).unwrap());
        assert_eq!(1 + article.properties.len() + article.methods.len(), sections.len());
        assert_eq!(article.properties.len(), 2);
        assert!(article.methods[0].signature.is_constructor());
        assert_eq!(article.properties[1].examples.len(), 1);
    }

    #[test]
    fn idempotent() {
        let html = fixture("alert.html");
        assert_eq!(process_article(&html).unwrap(), process_article(&html).unwrap());
    }

    #[test]
    fn foo_scenario() {
        let html = "<html><body><article>\
            <h1>Foo</h1><p>The foo.</p><hr>\
            <h2>bar</h2><div class=\"highlight\"><pre><code>bar: string</code></pre></div><hr>\
            <h2>-baz</h2><div class=\"highlight\"><pre><code>baz(): void</code></pre></div>\
            </article></body></html>";
        let decl = process_article(html).unwrap();
        assert_eq!(decl.file_name, "foo.d.ts");
        assert_eq!(
            decl.content,
            "/**\n * The foo.\n */\nexport declare class Foo {\n    public bar: string;\n\n    baz(): void;\n}\n"
        );
    }

    #[test]
    fn prose_only_method_is_rejected() {
        let err = process_article(&fixture("broken_method.html")).unwrap_err();
        assert_eq!(err, ParseError::MissingSignatureCodeBlock("-schedule".into()));
    }

    #[test]
    fn body_without_heading() {
        let html = "<html><body><article><p>Just prose.</p></article></body></html>";
        assert!(matches!(process_article(html), Err(ParseError::Classification(_))));
    }
}

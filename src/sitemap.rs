use anyhow::{Context, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use tracing::info;

pub const DEFAULT_BASE_URL: &str = "https://docs.scriptable.app";
const SITEMAP_PATH: &str = "/sitemap.xml";

/// Fetch the docs sitemap and return the article page URLs.
pub async fn fetch_article_urls(client: &reqwest::Client, base_url: &str) -> Result<Vec<String>> {
    let sitemap_url = format!("{}{}", base_url.trim_end_matches('/'), SITEMAP_PATH);

    info!("Fetching sitemap: {}", sitemap_url);
    let xml = client
        .get(&sitemap_url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .with_context(|| format!("Failed to fetch sitemap {sitemap_url}"))?
        .text()
        .await
        .context("Failed to read sitemap body")?;

    let urls = parse_article_urls(&xml, base_url)?;
    info!("Total URLs in sitemap: {}", urls.total);
    info!("Article pages after filtering: {}", urls.articles.len());
    Ok(urls.articles)
}

/// `<loc>` entries of a sitemap, split into the count seen and the article
/// pages kept.
#[derive(Debug, Default)]
pub struct SitemapUrls {
    pub total: usize,
    pub articles: Vec<String>,
}

/// Matches one-segment pages under the docs host (`<base>/alert/`), which is
/// where the API articles live. The index page itself does not match.
fn article_pattern(base_url: &str) -> Result<Regex> {
    let base = regex::escape(base_url.trim_end_matches('/'));
    Ok(Regex::new(&format!(r"^{base}/[a-z0-9][a-z0-9_-]*/?$"))?)
}

/// Walk a urlset and keep the article `<loc>`s as they are read. Only a
/// `<loc>` directly inside a `<url>` counts.
pub fn parse_article_urls(xml: &str, base_url: &str) -> Result<SitemapUrls> {
    let article = article_pattern(base_url)?;
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut depth_in_url: Option<usize> = None;
    let mut depth = 0usize;
    let mut loc = String::new();
    let mut out = SitemapUrls::default();

    loop {
        match reader.read_event().context("Malformed sitemap XML")? {
            Event::Start(e) => {
                depth += 1;
                if e.local_name().as_ref() == b"url" && depth_in_url.is_none() {
                    depth_in_url = Some(depth);
                }
            }
            Event::Text(t) if depth_in_url.is_some_and(|d| depth == d + 1) => {
                loc.push_str(&t.unescape()?);
            }
            Event::End(e) => {
                match e.local_name().as_ref() {
                    b"loc" if depth_in_url.is_some_and(|d| depth == d + 1) => {
                        let url = std::mem::take(&mut loc);
                        out.total += 1;
                        if article.is_match(url.trim()) {
                            out.articles.push(url.trim().to_string());
                        }
                    }
                    b"url" if depth_in_url == Some(depth) => depth_in_url = None,
                    _ => loc.clear(),
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SITEMAP: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
    <url>
         <loc>https://docs.scriptable.app/</loc>
         <changefreq>daily</changefreq>
    </url>
    <url>
         <loc>https://docs.scriptable.app/alert/</loc>
    </url>
    <url>
         <loc>https://docs.scriptable.app/callbackurl/</loc>
    </url>
    <url>
         <loc>https://docs.scriptable.app/assets/images/favicon.png</loc>
    </url>
</urlset>"#;

    #[test]
    fn counts_locs_and_keeps_articles() {
        let urls = parse_article_urls(SITEMAP, DEFAULT_BASE_URL).unwrap();
        assert_eq!(urls.total, 4);
        assert_eq!(
            urls.articles,
            vec!["https://docs.scriptable.app/alert/", "https://docs.scriptable.app/callbackurl/"]
        );
    }

    #[test]
    fn loc_outside_url_is_ignored() {
        let xml = r#"<urlset><loc>https://docs.scriptable.app/stray/</loc>
<url><loc>https://docs.scriptable.app/alert/</loc><image><loc>https://docs.scriptable.app/nested/</loc></image></url></urlset>"#;
        let urls = parse_article_urls(xml, DEFAULT_BASE_URL).unwrap();
        assert_eq!(urls.total, 1);
        assert_eq!(urls.articles, vec!["https://docs.scriptable.app/alert/"]);
    }

    #[test]
    fn trailing_slash_on_base() {
        let xml = "<urlset><url><loc>http://localhost:8000/alert/</loc></url></urlset>";
        let urls = parse_article_urls(xml, "http://localhost:8000/").unwrap();
        assert_eq!(urls.articles, vec!["http://localhost:8000/alert/"]);
    }

    #[test]
    fn malformed_xml_errors() {
        assert!(parse_article_urls("<urlset><url><loc>x</url>", DEFAULT_BASE_URL).is_err());
    }
}

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::sitemap;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Where article URLs and their HTML come from.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    async fn fetch_article_urls(&self) -> Result<Vec<String>>;
    async fn fetch_article(&self, url: &str) -> Result<String>;
}

pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, base_url: base_url.to_string() })
    }
}

#[async_trait]
impl ArticleSource for HttpSource {
    async fn fetch_article_urls(&self) -> Result<Vec<String>> {
        sitemap::fetch_article_urls(&self.client, &self.base_url).await
    }

    async fn fetch_article(&self, url: &str) -> Result<String> {
        self.client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("Failed to fetch {url}"))?
            .text()
            .await
            .with_context(|| format!("Failed to read body of {url}"))
    }
}

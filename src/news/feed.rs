// =============================================================================
// Feed Fetcher — RSS / Atom retrieval with soft failure
// =============================================================================
//
// Any failure (transport, HTTP status, parse) is logged and turned into an
// empty sequence, so one broken source never stops the digest. Callers cannot
// tell "feed failed" from "feed was empty" and must not try to.
// =============================================================================

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::news::normalize::strip_tags;
use crate::retry::RetryPolicy;

/// A named feed URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSource {
    pub name: String,
    pub url: String,
}

impl FeedSource {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// One feed entry as consumed by the digest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub source: String,
    pub title: String,
    pub link: String,
    pub published: Option<DateTime<Utc>>,
    pub summary: String,
}

impl NewsItem {
    fn from_entry(source: &str, entry: feed_rs::model::Entry) -> Self {
        let summary = entry
            .summary
            .map(|t| t.content)
            .or_else(|| entry.content.and_then(|c| c.body))
            .unwrap_or_default();

        Self {
            source: source.to_string(),
            title: entry.title.map(|t| t.content).unwrap_or_default(),
            link: entry.links.into_iter().next().map(|l| l.href).unwrap_or_default(),
            published: entry.published.or(entry.updated),
            summary,
        }
    }

    pub fn published_label(&self) -> String {
        self.published
            .map(|t| t.to_rfc2822())
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// `title;published;summary` with markup stripped from every field.
    pub fn digest_line(&self) -> String {
        format!(
            "{};{};{}",
            strip_tags(&self.title),
            strip_tags(&self.published_label()),
            strip_tags(&self.summary)
        )
    }
}

/// Parse `bytes` as a feed and lazily yield at most `limit` items.
///
/// A parse failure is logged and yields nothing.
pub fn items_from_bytes(source: &str, bytes: &[u8], limit: usize) -> impl Iterator<Item = NewsItem> + 'static {
    let entries = match feed_rs::parser::parse(bytes) {
        Ok(feed) => feed.entries,
        Err(e) => {
            warn!(source, error = %e, "failed to parse feed");
            Vec::new()
        }
    };

    let source = source.to_string();
    entries
        .into_iter()
        .take(limit)
        .map(move |entry| NewsItem::from_entry(&source, entry))
}

/// HTTP side of the fetcher.
#[derive(Debug, Clone)]
pub struct FeedFetcher {
    client: reqwest::Client,
    retry: RetryPolicy,
    items_per_feed: usize,
}

impl FeedFetcher {
    pub fn new(retry: RetryPolicy, items_per_feed: usize) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("market-brief/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build feed HTTP client")?;

        Ok(Self {
            client,
            retry,
            items_per_feed,
        })
    }

    /// Fetch `source` and yield its first `items_per_feed` entries.
    #[instrument(skip(self, source), fields(source = %source.name), name = "feed::fetch")]
    pub async fn fetch(&self, source: &FeedSource) -> impl Iterator<Item = NewsItem> + 'static {
        let bytes = match self.fetch_bytes(&source.url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(source = %source.name, error = %e, "failed to fetch feed");
                Vec::new()
            }
        };

        if !bytes.is_empty() {
            debug!(source = %source.name, bytes = bytes.len(), "feed fetched");
        }
        // An empty body also goes through the parser, which rejects it and logs.
        items_from_bytes(&source.name, &bytes, self.items_per_feed)
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let resp = self
            .retry
            .send("feed::get", || self.client.get(url))
            .await
            .with_context(|| format!("GET {url} request failed"))?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("feed {} returned {}", url, status);
        }

        let bytes = resp
            .bytes()
            .await
            .with_context(|| format!("failed to read feed body from {url}"))?;
        Ok(bytes.to_vec())
    }
}

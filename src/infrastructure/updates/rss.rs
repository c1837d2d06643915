//! RSS 2.0 update feed

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::{RagError, UpdateFeed, UpdateItem};
use crate::infrastructure::llm::HttpClientTrait;

static ITEM_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<item\b[^>]*>(.*?)</item>").unwrap());

static TITLE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<title\b[^>]*>(.*?)</title>").unwrap());

static LINK_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<link\b[^>]*>(.*?)</link>").unwrap());

static PUB_DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<pubDate\b[^>]*>(.*?)</pubDate>").unwrap());

static CDATA_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^\s*<!\[CDATA\[(.*?)\]\]>\s*$").unwrap());

/// Fetches an RSS document and lists its `<item>` entries in feed order
#[derive(Debug)]
pub struct RssUpdateFeed<C: HttpClientTrait> {
    client: C,
    feed_url: String,
}

impl<C: HttpClientTrait> RssUpdateFeed<C> {
    pub fn new(client: C, feed_url: impl Into<String>) -> Self {
        Self {
            client,
            feed_url: feed_url.into(),
        }
    }
}

#[async_trait]
impl<C: HttpClientTrait> UpdateFeed for RssUpdateFeed<C> {
    async fn fetch(&self, limit: usize) -> Result<Vec<UpdateItem>, RagError> {
        let document = self
            .client
            .get_text(&self.feed_url)
            .await
            .map_err(|e| RagError::upstream(format!("update feed: {}", e)))?;

        let mut items = parse_rss_items(&document);
        items.truncate(limit);

        tracing::debug!(feed = %self.feed_url, items = items.len(), "Fetched update feed");
        Ok(items)
    }
}

/// Extracts title, link and publication date of every `<item>`
///
/// Missing fields become empty strings. CDATA sections are unwrapped and the
/// five predefined XML entities are decoded.
pub fn parse_rss_items(document: &str) -> Vec<UpdateItem> {
    ITEM_PATTERN
        .captures_iter(document)
        .filter_map(|caps| caps.get(1))
        .map(|block| {
            let block = block.as_str();
            UpdateItem::new(
                field(&TITLE_PATTERN, block),
                field(&LINK_PATTERN, block),
                field(&PUB_DATE_PATTERN, block),
            )
        })
        .collect()
}

fn field(pattern: &Regex, block: &str) -> String {
    let Some(raw) = pattern
        .captures(block)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
    else {
        return String::new();
    };

    match CDATA_PATTERN.captures(raw).and_then(|caps| caps.get(1)) {
        Some(inner) => inner.as_str().trim().to_string(),
        None => decode_entities(raw.trim()),
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

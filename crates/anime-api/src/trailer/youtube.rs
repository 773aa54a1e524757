//! YouTube Data API keyword search.
//!
//! Only constructed when an API key is configured.

use super::TitleLookup;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
}

#[derive(Debug, Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

pub struct YouTubeSearchClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl YouTubeSearchClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .context("Failed to build YouTube HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Build the search client only when a usable key is present
    pub fn from_optional_key(
        base_url: &str,
        api_key: Option<&str>,
        timeout: Duration,
    ) -> Result<Option<Self>> {
        match api_key.map(str::trim).filter(|k| !k.is_empty()) {
            Some(key) => Ok(Some(Self::new(base_url, key, timeout)?)),
            None => Ok(None),
        }
    }
}

fn search_terms(title: &str) -> String {
    format!("{} official trailer", title.trim())
}

#[async_trait]
impl TitleLookup for YouTubeSearchClient {
    async fn find_by_title(&self, title: &str) -> Result<Option<String>> {
        let url = format!("{}/search", self.base_url);

        let res = self
            .client
            .get(&url)
            .query(&[
                ("part", "snippet"),
                ("type", "video"),
                ("maxResults", "1"),
                ("q", search_terms(title).as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .context("YouTube search request failed")?;

        let status = res.status();
        if !status.is_success() {
            // The body may echo the key back, so only the status is kept
            return Err(anyhow!("YouTube search HTTP error (status {})", status));
        }

        let parsed: SearchResponse = res
            .json()
            .await
            .context("Failed to parse YouTube search JSON")?;

        let id = parsed
            .items
            .into_iter()
            .find_map(|item| item.id.video_id)
            .filter(|id| !id.is_empty());

        debug!(title = title, found = id.is_some(), "YouTube trailer search");
        Ok(id)
    }

    fn name(&self) -> &'static str {
        "youtube"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_without_key() {
        let timeout = Duration::from_secs(5);
        let base = "https://www.googleapis.com/youtube/v3";

        assert!(YouTubeSearchClient::from_optional_key(base, None, timeout)
            .unwrap()
            .is_none());
        assert!(YouTubeSearchClient::from_optional_key(base, Some(" "), timeout)
            .unwrap()
            .is_none());
        assert!(YouTubeSearchClient::from_optional_key(base, Some("key"), timeout)
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_parse_search_response() {
        let parsed: SearchResponse = serde_json::from_str(
            r#"{"kind": "youtube#searchListResponse",
                "items": [{"id": {"kind": "youtube#video", "videoId": "dQw4w9WgXcQ"}}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.items[0].id.video_id.as_deref(), Some("dQw4w9WgXcQ"));

        let empty: SearchResponse = serde_json::from_str(r#"{"kind": "x"}"#).unwrap();
        assert!(empty.items.is_empty());
    }

    #[test]
    fn test_search_terms() {
        assert_eq!(search_terms(" Dandadan "), "Dandadan official trailer");
    }
}

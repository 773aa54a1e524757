//! AniList GraphQL trailer lookup.

use super::TitleLookup;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

const TRAILER_QUERY: &str = r#"
query ($search: String) {
  Media(search: $search, type: ANIME) {
    id
    trailer { id site }
  }
}
"#;

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<Data>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
    status: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct Data {
    #[serde(rename = "Media")]
    media: Option<Media>,
}

#[derive(Debug, Deserialize)]
struct Media {
    trailer: Option<MediaTrailer>,
}

#[derive(Debug, Deserialize)]
struct MediaTrailer {
    id: Option<String>,
    site: Option<String>,
}

/// Client for the AniList GraphQL endpoint
#[derive(Debug, Clone)]
pub struct AniListClient {
    client: Client,
    endpoint: String,
}

impl AniListClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .user_agent(concat!("anime-api/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build AniList HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

/// Pull a YouTube id out of a decoded response
fn youtube_trailer(parsed: GraphQlResponse) -> Result<Option<String>> {
    if let Some(errors) = parsed.errors.filter(|errors| !errors.is_empty()) {
        // AniList answers an unknown title with a 404 inside the errors list
        if errors.iter().all(|e| e.status == Some(404)) {
            return Ok(None);
        }
        let msg = errors
            .into_iter()
            .map(|e| match e.status {
                Some(s) => format!("{} (status {})", e.message, s),
                None => e.message,
            })
            .collect::<Vec<_>>()
            .join("; ");
        return Err(anyhow!("AniList GraphQL error: {}", msg));
    }

    let trailer = parsed
        .data
        .and_then(|d| d.media)
        .and_then(|m| m.trailer);

    Ok(trailer.and_then(|t| match (t.site.as_deref(), t.id) {
        (Some(site), Some(id)) if site.eq_ignore_ascii_case("youtube") => Some(id),
        _ => None,
    }))
}

#[async_trait]
impl TitleLookup for AniListClient {
    async fn find_by_title(&self, title: &str) -> Result<Option<String>> {
        let body = json!({
            "query": TRAILER_QUERY,
            "variables": { "search": title }
        });

        let res = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .context("AniList request failed")?;

        let status = res.status();
        let bytes = res.bytes().await.context("Failed to read AniList body")?;

        let parsed: GraphQlResponse = match serde_json::from_slice(&bytes) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                return Err(anyhow!(
                    "AniList HTTP error (status {}): {}",
                    status,
                    String::from_utf8_lossy(&bytes)
                ));
            }
            Err(e) => return Err(e).context("Failed to parse AniList JSON"),
        };

        let id = youtube_trailer(parsed)?;
        debug!(title = title, found = id.is_some(), "AniList trailer lookup");
        Ok(id)
    }

    fn name(&self) -> &'static str {
        "anilist"
    }
}

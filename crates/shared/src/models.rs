//! Data models for the anime service.
//!
//! This module defines the records handed to clients and stored in the
//! cache: anime summaries, image sets, airing metadata and cache entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Image shown when the metadata source supplies none
pub const PLACEHOLDER_IMAGE_URL: &str = "https://placehold.co/225x318?text=No+Image";

/// Popularity assigned to unranked entries so they sort after every real value
pub const UNRANKED_POPULARITY: u32 = u32::MAX;

/// Anime summary as served to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimeSummary {
    pub mal_id: u32,              // MyAnimeList ID

    // Titles
    pub title: String,
    pub title_english: Option<String>,
    pub title_japanese: Option<String>,

    pub images: ImageUrls,

    // Scores and rankings
    pub score: Option<f64>,
    pub popularity: u32,
    /// 1-based position in the returned list
    pub rank: u32,

    pub episodes: Option<u32>,
    pub year: Option<i32>,
    pub status: AiringStatus,
    pub rating: Option<String>,

    // Classifications
    pub genres: Vec<String>,
    pub themes: Vec<String>,
    pub demographics: Vec<String>,
    pub studios: Vec<String>,

    // Trailer (both absent is a valid state)
    pub trailer_url: Option<String>,
    pub trailer_youtube_id: Option<String>,

    pub synopsis: Option<String>,
    pub airing: AiringSchedule,
}

impl AnimeSummary {
    /// Bare summary with every optional field unset
    pub fn new(mal_id: u32, title: impl Into<String>) -> Self {
        Self {
            mal_id,
            title: title.into(),
            title_english: None,
            title_japanese: None,
            images: ImageUrls::placeholder(),
            score: None,
            popularity: UNRANKED_POPULARITY,
            rank: 0,
            episodes: None,
            year: None,
            status: AiringStatus::Unknown,
            rating: None,
            genres: Vec::new(),
            themes: Vec::new(),
            demographics: Vec::new(),
            studios: Vec::new(),
            trailer_url: None,
            trailer_youtube_id: None,
            synopsis: None,
            airing: AiringSchedule::default(),
        }
    }

    /// Attach a trailer, deriving the watch URL from the identifier when needed
    pub fn apply_trailer(&mut self, candidate: TrailerCandidate) {
        match candidate.youtube_id {
            Some(id) => {
                self.trailer_url = Some(candidate.url.unwrap_or_else(|| youtube_watch_url(&id)));
                self.trailer_youtube_id = Some(id);
            }
            None => {
                self.trailer_youtube_id = None;
                self.trailer_url = candidate.url;
            }
        }
    }

    pub fn has_trailer_id(&self) -> bool {
        self.trailer_youtube_id.is_some()
    }
}

/// Image URLs in three sizes, each falling back to the placeholder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrls {
    pub small: String,
    pub medium: String,
    pub large: String,
}

impl ImageUrls {
    /// Build an image set, substituting the placeholder for missing sizes
    pub fn from_optional(
        small: Option<String>,
        medium: Option<String>,
        large: Option<String>,
    ) -> Self {
        let pick = |url: Option<String>| {
            url.filter(|u| !u.trim().is_empty())
                .unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_string())
        };

        Self {
            small: pick(small),
            medium: pick(medium),
            large: pick(large),
        }
    }

    pub fn placeholder() -> Self {
        Self::from_optional(None, None, None)
    }
}

/// Airing status normalized from the source's free-text value
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AiringStatus {
    CurrentlyAiring,
    FinishedAiring,
    Unknown,
}

impl AiringStatus {
    /// Normalize a status label such as "Currently Airing"
    pub fn from_source(label: Option<&str>) -> Self {
        let Some(label) = label else {
            return AiringStatus::Unknown;
        };

        match label.trim().to_ascii_lowercase().as_str() {
            "currently airing" | "currently_airing" | "airing" => AiringStatus::CurrentlyAiring,
            "finished airing" | "finished_airing" | "finished" => AiringStatus::FinishedAiring,
            _ => AiringStatus::Unknown,
        }
    }
}

impl std::fmt::Display for AiringStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AiringStatus::CurrentlyAiring => write!(f, "currently_airing"),
            AiringStatus::FinishedAiring => write!(f, "finished_airing"),
            AiringStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// Airing dates and weekly broadcast slot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiringSchedule {
    pub aired_from: Option<String>,
    pub aired_to: Option<String>,
    pub season: Option<String>,
    pub duration: Option<String>,
    pub broadcast_day: Option<String>,
    pub broadcast_time: Option<String>,
    pub broadcast_timezone: Option<String>,
    pub broadcast: Option<String>,
}

/// Result of a single trailer lookup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailerCandidate {
    pub youtube_id: Option<String>,
    pub url: Option<String>,
}

impl TrailerCandidate {
    /// No trailer found; a legitimate terminal state
    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_youtube_id(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            url: Some(youtube_watch_url(&id)),
            youtube_id: Some(id),
        }
    }

    pub fn is_match(&self) -> bool {
        self.youtube_id.is_some()
    }
}

/// Cached result set with its expiry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    pub value: Vec<AnimeSummary>,
    pub expires_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Watch URL for a YouTube video identifier
pub fn youtube_watch_url(id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", id)
}

/// Recover a YouTube video identifier from a watch or embed URL
pub fn youtube_id_from_url(url: &str) -> Option<String> {
    let url = url.trim();

    let candidate = if let Some((_, rest)) = url.split_once("/embed/") {
        rest
    } else if let Some((_, rest)) = url.split_once("watch?v=") {
        rest
    } else if let Some((_, rest)) = url.split_once("youtu.be/") {
        rest
    } else {
        return None;
    };

    let id: String = candidate
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();

    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}

/// Assign dense 1-based ranks matching list order
pub fn assign_ranks(list: &mut [AnimeSummary]) {
    for (idx, anime) in list.iter_mut().enumerate() {
        anime.rank = idx as u32 + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_normalization() {
        assert_eq!(
            AiringStatus::from_source(Some("Currently Airing")),
            AiringStatus::CurrentlyAiring
        );
        assert_eq!(
            AiringStatus::from_source(Some("Finished Airing")),
            AiringStatus::FinishedAiring
        );
        assert_eq!(AiringStatus::from_source(Some("Not yet aired")), AiringStatus::Unknown);
        assert_eq!(AiringStatus::from_source(None), AiringStatus::Unknown);
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&AiringStatus::CurrentlyAiring).unwrap();
        assert_eq!(json, "\"currently_airing\"");
    }

    #[test]
    fn test_image_placeholder() {
        let images =
            ImageUrls::from_optional(Some("https://img/a.jpg".into()), None, Some("  ".into()));
        assert_eq!(images.small, "https://img/a.jpg");
        assert_eq!(images.medium, PLACEHOLDER_IMAGE_URL);
        assert_eq!(images.large, PLACEHOLDER_IMAGE_URL);
    }

    #[test]
    fn test_youtube_id_from_url() {
        assert_eq!(
            youtube_id_from_url("https://www.youtube-nocookie.com/embed/abc_DEF-123?enablejsapi=1"),
            Some("abc_DEF-123".to_string())
        );
        assert_eq!(
            youtube_id_from_url("https://www.youtube.com/watch?v=xyz987&t=3"),
            Some("xyz987".to_string())
        );
        assert_eq!(youtube_id_from_url("https://youtu.be/short1"), Some("short1".to_string()));
        assert_eq!(youtube_id_from_url("https://example.com/video"), None);
    }

    #[test]
    fn test_trailer_url_derived_from_id() {
        let candidate = TrailerCandidate::from_youtube_id("abc123");
        assert_eq!(
            candidate.url.as_deref(),
            Some("https://www.youtube.com/watch?v=abc123")
        );

        let mut anime = AnimeSummary::new(1, "Test");

        anime.apply_trailer(TrailerCandidate {
            youtube_id: Some("zzz".into()),
            url: None,
        });
        assert_eq!(anime.trailer_url.as_deref(), Some("https://www.youtube.com/watch?v=zzz"));
        assert!(anime.has_trailer_id());

        anime.apply_trailer(TrailerCandidate::none());
        assert_eq!(anime.trailer_url, None);
        assert_eq!(anime.trailer_youtube_id, None);
    }
}

//! Jikan API v4 response types.
//!
//! These types represent the JSON responses from the Jikan API. Every field the
//! service does not strictly need is optional so partial records still decode.

use serde::{Deserialize, Serialize};
use shared::{
    youtube_id_from_url, AiringSchedule, AiringStatus, AnimeSummary, ImageUrls,
    UNRANKED_POPULARITY,
};

/// Generic pagination wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// Single record wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SingleResponse<T> {
    pub data: T,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub last_visible_page: u32,
    pub has_next_page: bool,
    #[serde(default)]
    pub current_page: Option<u32>,
    #[serde(default)]
    pub items: Option<PaginationItems>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationItems {
    pub count: u32,
    pub total: u32,
    pub per_page: u32,
}

/// Anime record as returned by list and detail endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimeEntry {
    pub mal_id: u32,
    pub url: Option<String>,
    pub images: Option<AnimeImages>,
    pub trailer: Option<Trailer>,

    // Titles
    pub title: String,
    pub title_english: Option<String>,
    pub title_japanese: Option<String>,

    // Type and status
    #[serde(rename = "type")]
    pub anime_type: Option<String>,
    pub source: Option<String>,
    pub episodes: Option<u32>,
    pub status: Option<String>,
    pub airing: Option<bool>,

    // Dates
    pub aired: Option<Aired>,
    pub duration: Option<String>,
    pub rating: Option<String>,

    // Scores and rankings
    pub score: Option<f64>,
    pub scored_by: Option<u32>,
    pub rank: Option<u32>,
    pub popularity: Option<u32>,
    pub members: Option<u32>,

    pub synopsis: Option<String>,

    // Season
    pub season: Option<String>,
    pub year: Option<i32>,

    pub broadcast: Option<Broadcast>,

    pub studios: Vec<MalEntity>,
    pub genres: Vec<MalEntity>,
    pub themes: Vec<MalEntity>,
    pub demographics: Vec<MalEntity>,
}

/// Anime images
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimeImages {
    pub jpg: ImageSet,
    #[serde(default)]
    pub webp: Option<ImageSet>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSet {
    pub image_url: Option<String>,
    pub small_image_url: Option<String>,
    pub large_image_url: Option<String>,
}

/// Trailer reference attached to an anime record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Trailer {
    pub youtube_id: Option<String>,
    pub url: Option<String>,
    pub embed_url: Option<String>,
}

/// Aired dates
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Aired {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Broadcast information
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Broadcast {
    pub day: Option<String>,
    pub time: Option<String>,
    pub timezone: Option<String>,
    pub string: Option<String>,
}

/// MAL entity (genre, studio, producer, etc.)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MalEntity {
    pub mal_id: u32,
    #[serde(rename = "type", default)]
    pub entity_type: Option<String>,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// Error response from Jikan API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JikanErrorBody {
    pub status: u16,
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    pub message: String,
}

impl Trailer {
    /// YouTube identifier, recovered from the URLs when the id field is empty
    pub fn video_id(&self) -> Option<String> {
        self.youtube_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .or_else(|| self.embed_url.as_deref().and_then(youtube_id_from_url))
            .or_else(|| self.url.as_deref().and_then(youtube_id_from_url))
    }
}

impl AnimeEntry {
    /// Convert to the client-facing summary
    ///
    /// Missing images become the placeholder, missing popularity becomes the
    /// unranked sentinel. `rank` is left at zero for the caller to assign.
    pub fn into_summary(self) -> AnimeSummary {
        let jpg = self.images.map(|i| i.jpg).unwrap_or_default();
        let trailer_id = self.trailer.as_ref().and_then(Trailer::video_id);
        let aired = self.aired.unwrap_or_default();
        let broadcast = self.broadcast.unwrap_or_default();
        let names = |entities: Vec<MalEntity>| -> Vec<String> {
            entities.into_iter().map(|e| e.name).collect()
        };

        let mut summary = AnimeSummary {
            mal_id: self.mal_id,
            title: self.title,
            title_english: self.title_english,
            title_japanese: self.title_japanese,
            images: ImageUrls::from_optional(
                jpg.small_image_url,
                jpg.image_url,
                jpg.large_image_url,
            ),
            score: self.score,
            popularity: self.popularity.unwrap_or(UNRANKED_POPULARITY),
            rank: 0,
            episodes: self.episodes,
            year: self.year,
            status: AiringStatus::from_source(self.status.as_deref()),
            rating: self.rating,
            genres: names(self.genres),
            themes: names(self.themes),
            demographics: names(self.demographics),
            studios: names(self.studios),
            trailer_url: None,
            trailer_youtube_id: None,
            synopsis: self.synopsis,
            airing: AiringSchedule {
                aired_from: aired.from,
                aired_to: aired.to,
                season: self.season,
                duration: self.duration,
                broadcast_day: broadcast.day,
                broadcast_time: broadcast.time,
                broadcast_timezone: broadcast.timezone,
                broadcast: broadcast.string,
            },
        };

        if let Some(id) = trailer_id {
            summary.apply_trailer(shared::TrailerCandidate::from_youtube_id(id));
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::PLACEHOLDER_IMAGE_URL;

    const SEASON_PAGE: &str = r#"{
        "pagination": {"last_visible_page": 3, "has_next_page": true, "current_page": 1,
                       "items": {"count": 2, "total": 60, "per_page": 25}},
        "data": [
            {
                "mal_id": 52991,
                "url": "https://myanimelist.net/anime/52991",
                "images": {"jpg": {"image_url": "https://cdn/m.jpg", "small_image_url": null,
                                   "large_image_url": "https://cdn/l.jpg"}},
                "trailer": {"youtube_id": null, "url": null,
                            "embed_url": "https://www.youtube-nocookie.com/embed/qgQKpcqHpDE?enablejsapi=1"},
                "title": "Sousou no Frieren",
                "title_english": "Frieren: Beyond Journey's End",
                "title_japanese": "葬送のフリーレン",
                "type": "TV",
                "episodes": 28,
                "status": "Currently Airing",
                "airing": true,
                "aired": {"from": "2023-09-29T00:00:00+00:00", "to": null,
                          "prop": {"from": {"day": 29, "month": 9, "year": 2023}, "to": {}}},
                "rating": "PG-13 - Teens 13 or older",
                "score": 9.3,
                "popularity": 160,
                "synopsis": "An elf mage...",
                "season": "fall",
                "year": 2023,
                "broadcast": {"day": "Fridays", "time": "23:00", "timezone": "Asia/Tokyo",
                              "string": "Fridays at 23:00 (JST)"},
                "studios": [{"mal_id": 11, "type": "anime", "name": "Madhouse", "url": "x"}],
                "genres": [{"mal_id": 2, "type": "anime", "name": "Adventure", "url": "x"}],
                "themes": [],
                "demographics": [{"mal_id": 27, "type": "anime", "name": "Shounen", "url": "x"}]
            },
            {"mal_id": 1, "title": "Bare Entry"}
        ]
    }"#;

    #[test]
    fn test_parse_season_page() {
        let page: PaginatedResponse<AnimeEntry> = serde_json::from_str(SEASON_PAGE).unwrap();
        assert_eq!(page.data.len(), 2);
        assert!(page.pagination.unwrap().has_next_page);
    }

    #[test]
    fn test_full_entry_to_summary() {
        let page: PaginatedResponse<AnimeEntry> = serde_json::from_str(SEASON_PAGE).unwrap();
        let summary = page.data[0].clone().into_summary();

        assert_eq!(summary.mal_id, 52991);
        assert_eq!(summary.popularity, 160);
        assert_eq!(summary.status, AiringStatus::CurrentlyAiring);
        assert_eq!(summary.images.small, PLACEHOLDER_IMAGE_URL);
        assert_eq!(summary.images.large, "https://cdn/l.jpg");
        assert_eq!(summary.studios, vec!["Madhouse".to_string()]);
        assert_eq!(summary.demographics, vec!["Shounen".to_string()]);
        assert_eq!(summary.trailer_youtube_id.as_deref(), Some("qgQKpcqHpDE"));
        assert_eq!(
            summary.trailer_url.as_deref(),
            Some("https://www.youtube.com/watch?v=qgQKpcqHpDE")
        );
        assert_eq!(summary.airing.broadcast_day.as_deref(), Some("Fridays"));
    }

    #[test]
    fn test_bare_entry_defaults() {
        let page: PaginatedResponse<AnimeEntry> = serde_json::from_str(SEASON_PAGE).unwrap();
        let summary = page.data[1].clone().into_summary();

        assert_eq!(summary.title, "Bare Entry");
        assert_eq!(summary.popularity, UNRANKED_POPULARITY);
        assert_eq!(summary.score, None);
        assert_eq!(summary.status, AiringStatus::Unknown);
        assert_eq!(summary.images, ImageUrls::placeholder());
        assert!(summary.genres.is_empty());
        assert_eq!(summary.trailer_youtube_id, None);
    }

    #[test]
    fn test_trailer_prefers_explicit_id() {
        let trailer = Trailer {
            youtube_id: Some("explicit".into()),
            url: Some("https://www.youtube.com/watch?v=other".into()),
            embed_url: None,
        };
        assert_eq!(trailer.video_id().as_deref(), Some("explicit"));
    }

    #[test]
    fn test_parse_error_body() {
        let body: JikanErrorBody = serde_json::from_str(
            r#"{"status": 404, "type": "BadResponseException", "message": "Resource does not exist"}"#,
        )
        .unwrap();
        assert_eq!(body.status, 404);
    }
}

//! Jikan API v4 client implementation.
//!
//! This module provides a rate-limited, retry-enabled client for interacting
//! with the Jikan API (MyAnimeList unofficial API), and the `AnimeSource`
//! seam the rest of the crate depends on.

pub mod client;
pub mod error;
pub mod rate_limiter;
pub mod types;

pub use client::JikanClient;
pub use error::JikanError;
pub use rate_limiter::RateLimiter;
pub use types::*;

use async_trait::async_trait;

/// Read-only anime metadata source
#[async_trait]
pub trait AnimeSource: Send + Sync {
    /// Anime airing in the current season, in source order
    async fn season_now(&self, limit: u32) -> Result<Vec<AnimeEntry>, JikanError>;

    /// Free-text search
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<AnimeEntry>, JikanError>;

    /// Most popular anime
    async fn top_by_popularity(&self, limit: u32) -> Result<Vec<AnimeEntry>, JikanError>;

    /// Full record by MyAnimeList id
    async fn anime_by_id(&self, mal_id: u32) -> Result<AnimeEntry, JikanError>;
}

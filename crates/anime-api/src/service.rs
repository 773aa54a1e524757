//! Search, trending and by-id reads.
//!
//! These go straight to the metadata source without the trailer chain. Search
//! and by-id surface upstream failures to the caller; trending falls back to
//! the static list.

use crate::api::{AnimeSource, JikanError};
use crate::catalog::StaticFallbackCatalog;
use crate::seasonal::select_top;
use anyhow::Result;
use shared::{assign_ranks, AnimeSummary};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Long-lived per-id anime records
pub trait AnimeRecordStore: Send + Sync {
    fn find(&self, mal_id: u32) -> Result<Option<AnimeSummary>>;

    /// Store a record unless one already exists for its id
    fn insert(&self, anime: &AnimeSummary) -> Result<()>;
}

pub struct AnimeService {
    source: Arc<dyn AnimeSource>,
    records: Arc<dyn AnimeRecordStore>,
    search_limit: u32,
    trending_limit: u32,
}

impl AnimeService {
    pub fn new(
        source: Arc<dyn AnimeSource>,
        records: Arc<dyn AnimeRecordStore>,
        search_limit: u32,
        trending_limit: u32,
    ) -> Self {
        Self {
            source,
            records,
            search_limit,
            trending_limit,
        }
    }

    /// Free-text search in upstream order; a blank query returns nothing
    pub async fn search(&self, query: &str) -> Result<Vec<AnimeSummary>, JikanError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let entries = self.source.search(query, self.search_limit).await?;
        let mut results: Vec<AnimeSummary> =
            entries.into_iter().map(|e| e.into_summary()).collect();
        assign_ranks(&mut results);

        debug!(query = query, results = results.len(), "Search complete");
        Ok(results)
    }

    /// Most popular anime, or the static list when the upstream is unavailable
    pub async fn trending(&self) -> Vec<AnimeSummary> {
        match self.source.top_by_popularity(self.trending_limit).await {
            Ok(entries) if !entries.is_empty() => {
                let pool = entries.into_iter().map(|e| e.into_summary()).collect();
                select_top(pool, self.trending_limit as usize)
            }
            Ok(_) => {
                warn!("Trending query returned nothing, serving static list");
                StaticFallbackCatalog::trending()
            }
            Err(e) => {
                warn!(error = %e, "Trending query failed, serving static list");
                StaticFallbackCatalog::trending()
            }
        }
    }

    /// Record by id, read through the record store
    pub async fn get_anime(&self, mal_id: u32) -> Result<AnimeSummary, JikanError> {
        match self.records.find(mal_id) {
            Ok(Some(anime)) => {
                debug!(mal_id = mal_id, "Anime record cache hit");
                return Ok(anime);
            }
            Ok(None) => {}
            Err(e) => warn!(mal_id = mal_id, error = %e, "Record lookup failed, fetching upstream"),
        }

        let anime = self.source.anime_by_id(mal_id).await?.into_summary();

        if let Err(e) = self.records.insert(&anime) {
            warn!(mal_id = mal_id, error = %e, "Failed to store anime record");
        } else {
            info!(mal_id = mal_id, title = %anime.title, "Stored anime record");
        }

        Ok(anime)
    }
}

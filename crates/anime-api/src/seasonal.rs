//! Current-season candidate pool.

use crate::api::AnimeSource;
use async_trait::async_trait;
use shared::{assign_ranks, AiringStatus, AnimeSummary};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Source of the pre-enrichment airing list
#[async_trait]
pub trait SeasonalFeed: Send + Sync {
    /// Ranked candidates; empty when the upstream is unavailable
    async fn fetch(&self) -> Vec<AnimeSummary>;
}

/// Fetches the current season from the metadata source and keeps the
/// `top_n` most popular entries
///
/// The whole call is bounded by `timeout`, including any time spent queued
/// on the source's rate limiter.
pub struct SeasonalListFetcher {
    source: Arc<dyn AnimeSource>,
    page_size: u32,
    top_n: usize,
    timeout: Duration,
}

impl SeasonalListFetcher {
    pub fn new(
        source: Arc<dyn AnimeSource>,
        page_size: u32,
        top_n: usize,
        timeout: Duration,
    ) -> Self {
        Self {
            source,
            page_size,
            top_n,
            timeout,
        }
    }
}

#[async_trait]
impl SeasonalFeed for SeasonalListFetcher {
    async fn fetch(&self) -> Vec<AnimeSummary> {
        let fetch = self.source.season_now(self.page_size);
        let entries = match tokio::time::timeout(self.timeout, fetch).await {
            Ok(Ok(entries)) => entries,
            Ok(Err(e)) => {
                warn!(error = %e, "Failed to fetch current season");
                return Vec::new();
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.timeout.as_millis(),
                    "Current season fetch timed out"
                );
                return Vec::new();
            }
        };

        let pool: Vec<AnimeSummary> = entries
            .into_iter()
            .map(|entry| {
                let mut summary = entry.into_summary();
                summary.score.get_or_insert(0.0);
                // The query only returns airing titles; late finishes are tolerated
                summary.status = AiringStatus::CurrentlyAiring;
                summary
            })
            .collect();

        let fetched = pool.len();
        let selected = select_top(pool, self.top_n);
        info!(fetched = fetched, selected = selected.len(), "Fetched seasonal candidates");
        selected
    }
}

/// Sort by popularity (stable, lower first), keep `top_n`, assign dense ranks
pub fn select_top(mut pool: Vec<AnimeSummary>, top_n: usize) -> Vec<AnimeSummary> {
    pool.sort_by_key(|anime| anime.popularity);
    pool.truncate(top_n);
    assign_ranks(&mut pool);
    pool
}

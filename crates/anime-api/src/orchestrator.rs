//! Top-airing pipeline.
//!
//! Cache check, seasonal fetch, sequential trailer enrichment, cache write.
//! The pipeline never fails outward: an empty candidate pool or a panic in
//! any collaborator yields the static catalog instead.

use crate::cache::ResultCache;
use crate::catalog::StaticFallbackCatalog;
use crate::seasonal::SeasonalFeed;
use crate::trailer::TrailerResolver;
use futures::FutureExt;
use shared::config::AiringConfig;
use shared::{assign_ranks, AnimeSummary};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Pipeline parameters fixed at construction
#[derive(Debug, Clone)]
pub struct AiringSettings {
    /// Single key shared by every caller
    pub cache_key: String,
    pub ttl: Duration,
    /// Pause after each trailer resolution
    pub delay: Duration,
    pub top_n: usize,
}

impl AiringSettings {
    pub fn from_config(config: &AiringConfig) -> Self {
        Self {
            cache_key: config.cache_key.clone(),
            ttl: Duration::from_secs(config.ttl_seconds),
            delay: Duration::from_millis(config.enrichment_delay_ms),
            top_n: config.top_n,
        }
    }
}

impl Default for AiringSettings {
    fn default() -> Self {
        Self::from_config(&AiringConfig::default())
    }
}

pub struct AiringListOrchestrator {
    cache: ResultCache,
    feed: Arc<dyn SeasonalFeed>,
    resolver: Arc<dyn TrailerResolver>,
    settings: AiringSettings,
}

impl AiringListOrchestrator {
    pub fn new(
        cache: ResultCache,
        feed: Arc<dyn SeasonalFeed>,
        resolver: Arc<dyn TrailerResolver>,
        settings: AiringSettings,
    ) -> Self {
        Self {
            cache,
            feed,
            resolver,
            settings,
        }
    }

    pub fn settings(&self) -> &AiringSettings {
        &self.settings
    }

    /// Current top-airing list; always non-empty
    pub async fn get_top_airing_anime(&self) -> Vec<AnimeSummary> {
        match AssertUnwindSafe(self.run()).catch_unwind().await {
            Ok(list) => list,
            Err(panic) => {
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                error!(reason = %reason, "Top-airing pipeline panicked, serving static catalog");
                StaticFallbackCatalog::snapshot()
            }
        }
    }

    async fn run(&self) -> Vec<AnimeSummary> {
        let key = self.settings.cache_key.as_str();

        match self.cache.get(key) {
            Some(entry) if !entry.value.is_empty() => {
                info!(
                    items = entry.value.len(),
                    updated_at = %entry.updated_at,
                    "Serving top-airing list from cache"
                );
                return entry.value;
            }
            Some(_) => debug!(key = key, "Cached top-airing list is empty, refreshing"),
            None => {}
        }

        let pool = self.feed.fetch().await;
        if pool.is_empty() {
            warn!("No seasonal candidates, serving static catalog");
            return StaticFallbackCatalog::snapshot();
        }

        let enriched = self.enrich(pool).await;
        self.cache.put(key, enriched.clone(), self.settings.ttl);

        info!(
            items = enriched.len(),
            with_trailer = enriched.iter().filter(|a| a.has_trailer_id()).count(),
            "Top-airing list refreshed"
        );
        enriched
    }

    /// Attach trailers one candidate at a time, pausing between lookups
    async fn enrich(&self, mut pool: Vec<AnimeSummary>) -> Vec<AnimeSummary> {
        pool.truncate(self.settings.top_n);

        let pending = pool.iter().filter(|a| !a.has_trailer_id()).count();
        let mut resolved = 0;

        for anime in pool.iter_mut() {
            if anime.has_trailer_id() {
                debug!(mal_id = anime.mal_id, "Trailer supplied by source");
                continue;
            }

            let candidate = self.resolver.resolve(anime).await;
            anime.apply_trailer(candidate);
            resolved += 1;

            // No pause after the final lookup
            if resolved < pending && !self.settings.delay.is_zero() {
                tokio::time::sleep(self.settings.delay).await;
            }
        }

        assign_ranks(&mut pool);
        pool
    }
}

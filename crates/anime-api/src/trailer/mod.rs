//! Trailer resolution.
//!
//! A trailer is looked up through an ordered chain of strategies, stopping at
//! the first one that yields a YouTube identifier:
//!
//! 1. graph lookup by native title
//! 2. graph lookup by English title (only when it differs from the native one)
//! 3. keyword video search (only when a search credential is configured)
//! 4. static trailer table
//!
//! Network strategies run under a per-call timeout. Errors and timeouts are
//! logged and count as a non-match, so one failing source never blocks the
//! remaining ones.

pub mod anilist;
pub mod table;
pub mod youtube;

pub use anilist::AniListClient;
pub use table::StaticTrailerTable;
pub use youtube::YouTubeSearchClient;

use anyhow::Result;
use async_trait::async_trait;
use shared::{AnimeSummary, TrailerCandidate};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// A source that maps a title to at most one YouTube video id
#[async_trait]
pub trait TitleLookup: Send + Sync {
    async fn find_by_title(&self, title: &str) -> Result<Option<String>>;

    /// Source name for logging
    fn name(&self) -> &'static str;
}

/// Anything that can attach a trailer to a summary
#[async_trait]
pub trait TrailerResolver: Send + Sync {
    async fn resolve(&self, summary: &AnimeSummary) -> TrailerCandidate;
}

/// Outcome of one strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Match(TrailerCandidate),
    NoMatch,
}

impl LookupOutcome {
    fn from_id(id: Option<String>) -> Self {
        match id.filter(|id| !id.trim().is_empty()) {
            Some(id) => LookupOutcome::Match(TrailerCandidate::from_youtube_id(id)),
            None => LookupOutcome::NoMatch,
        }
    }
}

/// Strategy position in the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    GraphByTitle,
    GraphByEnglishTitle,
    VideoSearch,
    StaticTable,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::GraphByTitle => "graph_title",
            Strategy::GraphByEnglishTitle => "graph_english_title",
            Strategy::VideoSearch => "video_search",
            Strategy::StaticTable => "static_table",
        }
    }
}

/// Ordered trailer lookup chain
pub struct TrailerLookupChain {
    graph: Arc<dyn TitleLookup>,
    /// Absent when no search credential is configured
    video_search: Option<Arc<dyn TitleLookup>>,
    table: StaticTrailerTable,
    call_timeout: Duration,
}

impl TrailerLookupChain {
    pub fn new(
        graph: Arc<dyn TitleLookup>,
        video_search: Option<Arc<dyn TitleLookup>>,
        table: StaticTrailerTable,
        call_timeout: Duration,
    ) -> Self {
        Self {
            graph,
            video_search,
            table,
            call_timeout,
        }
    }

    /// Run one network lookup under the per-call timeout
    async fn lookup(
        &self,
        source: &dyn TitleLookup,
        strategy: Strategy,
        title: &str,
    ) -> LookupOutcome {
        match timeout(self.call_timeout, source.find_by_title(title)).await {
            Ok(Ok(id)) => LookupOutcome::from_id(id),
            Ok(Err(e)) => {
                warn!(
                    source = source.name(),
                    strategy = strategy.as_str(),
                    title = title,
                    error = %e,
                    "Trailer lookup failed"
                );
                LookupOutcome::NoMatch
            }
            Err(_) => {
                warn!(
                    source = source.name(),
                    strategy = strategy.as_str(),
                    title = title,
                    timeout_ms = self.call_timeout.as_millis(),
                    "Trailer lookup timed out"
                );
                LookupOutcome::NoMatch
            }
        }
    }

    /// Run the chain, reporting which strategy matched
    pub async fn resolve_with_strategy(
        &self,
        summary: &AnimeSummary,
    ) -> Option<(Strategy, TrailerCandidate)> {
        if let LookupOutcome::Match(candidate) = self
            .lookup(self.graph.as_ref(), Strategy::GraphByTitle, &summary.title)
            .await
        {
            return Some((Strategy::GraphByTitle, candidate));
        }

        if let Some(english) = distinct_english_title(summary) {
            if let LookupOutcome::Match(candidate) = self
                .lookup(self.graph.as_ref(), Strategy::GraphByEnglishTitle, english)
                .await
            {
                return Some((Strategy::GraphByEnglishTitle, candidate));
            }
        }

        if let Some(search) = &self.video_search {
            if let LookupOutcome::Match(candidate) = self
                .lookup(search.as_ref(), Strategy::VideoSearch, &summary.title)
                .await
            {
                return Some((Strategy::VideoSearch, candidate));
            }
        }

        if let LookupOutcome::Match(candidate) = self.table.lookup(summary) {
            return Some((Strategy::StaticTable, candidate));
        }

        None
    }
}

#[async_trait]
impl TrailerResolver for TrailerLookupChain {
    async fn resolve(&self, summary: &AnimeSummary) -> TrailerCandidate {
        match self.resolve_with_strategy(summary).await {
            Some((strategy, candidate)) => {
                debug!(
                    mal_id = summary.mal_id,
                    strategy = strategy.as_str(),
                    youtube_id = candidate.youtube_id.as_deref().unwrap_or_default(),
                    "Trailer resolved"
                );
                candidate
            }
            None => {
                debug!(mal_id = summary.mal_id, title = %summary.title, "No trailer found");
                TrailerCandidate::none()
            }
        }
    }
}

/// English title worth a second lookup, if any
fn distinct_english_title(summary: &AnimeSummary) -> Option<&str> {
    let english = summary.title_english.as_deref()?.trim();
    if english.is_empty() || english.eq_ignore_ascii_case(summary.title.trim()) {
        None
    } else {
        Some(english)
    }
}

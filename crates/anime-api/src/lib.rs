//! Anime metadata service.
//!
//! Serves search, trending, by-id and top-airing views over the Jikan API.
//! The top-airing view is enriched with trailers through an ordered lookup
//! chain, cached with a TTL, and backed by a static catalog when live data
//! cannot be produced.

pub mod api;
pub mod cache;
pub mod catalog;
pub mod orchestrator;
pub mod seasonal;
pub mod server;
pub mod service;
pub mod store;
pub mod trailer;

pub use api::{AnimeSource, JikanClient, JikanError, RateLimiter};
pub use cache::{CacheStore, ResultCache};
pub use catalog::StaticFallbackCatalog;
pub use orchestrator::{AiringListOrchestrator, AiringSettings};
pub use seasonal::{SeasonalFeed, SeasonalListFetcher};
pub use server::{build_router, AppError, AppState};
pub use service::{AnimeRecordStore, AnimeService};
pub use store::SqliteStore;
pub use trailer::{
    AniListClient, LookupOutcome, StaticTrailerTable, Strategy, TitleLookup, TrailerLookupChain,
    TrailerResolver, YouTubeSearchClient,
};

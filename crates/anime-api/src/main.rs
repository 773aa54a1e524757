//! Anime API server.

use anime_api::{
    build_router, AiringListOrchestrator, AiringSettings, AniListClient, AnimeService, AppState,
    JikanClient, ResultCache, SeasonalListFetcher, SqliteStore, StaticTrailerTable, TitleLookup,
    TrailerLookupChain, YouTubeSearchClient,
};
use anyhow::{Context, Result};
use clap::Parser;
use shared::{Config, Database};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Listen port (overrides config and PORT)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;
    config
        .apply_env_overrides()
        .context("Invalid environment override")?;
    if let Some(port) = args.port {
        config.server.port = port;
    }

    // Initialize logging; the guard lives until shutdown
    let _log_guard = shared::logging::init(shared::LogConfig::from_settings(
        &config.logging,
        config.log_dir(),
        "anime-api",
        args.verbose,
    ))?;

    info!("Anime API starting");
    info!(config_file = %args.config.display(), "Loaded configuration");

    // Initialize database
    let db_path = config.database_path();
    info!(db_path = %db_path.display(), "Opening database");
    let database = Database::open(&db_path).context("Failed to open database")?;
    let store = Arc::new(SqliteStore::new(database));

    // Upstream clients
    let jikan = Arc::new(
        JikanClient::from_config(&config.jikan).context("Failed to create Jikan client")?,
    );

    let lookup_timeout = config.lookup_timeout();
    let anilist = Arc::new(
        AniListClient::new(config.trailers.anilist_url.clone(), lookup_timeout)
            .context("Failed to create AniList client")?,
    );
    let youtube = YouTubeSearchClient::from_optional_key(
        &config.trailers.youtube_base_url,
        config.youtube_api_key(),
        lookup_timeout,
    )
    .context("Failed to create YouTube client")?
    .map(|client| Arc::new(client) as Arc<dyn TitleLookup>);

    info!(
        video_search = youtube.is_some(),
        lookup_timeout_secs = lookup_timeout.as_secs(),
        "Trailer lookup chain configured"
    );

    let chain = Arc::new(TrailerLookupChain::new(
        anilist,
        youtube,
        StaticTrailerTable::builtin(),
        lookup_timeout,
    ));

    // Top-airing pipeline
    let settings = AiringSettings::from_config(&config.airing);
    let feed = Arc::new(SeasonalListFetcher::new(
        jikan.clone(),
        config.jikan.seasonal_page_size,
        settings.top_n,
        Duration::from_secs(config.jikan.timeout_seconds),
    ));
    let orchestrator = Arc::new(AiringListOrchestrator::new(
        ResultCache::new(store.clone()),
        feed,
        chain,
        settings,
    ));

    let service = Arc::new(AnimeService::new(
        jikan,
        store,
        config.jikan.search_limit,
        config.jikan.trending_limit,
    ));

    let app = build_router(AppState::new(orchestrator, service), &config.server.cors_origins);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!("Invalid listen address {}:{}", config.server.host, config.server.port)
        })?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(address = %addr, "Anime API listening");
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

//! HTTP tests for the anime API router.
//!
//! The router is driven in-process with `oneshot`; upstream services are
//! replaced with in-memory doubles and the database is in-memory SQLite.

use anime_api::api::AnimeEntry;
use anime_api::{
    build_router, AiringListOrchestrator, AiringSettings, AnimeService, AnimeSource, AppState,
    JikanError, ResultCache, SeasonalListFetcher, SqliteStore, StaticFallbackCatalog,
    StaticTrailerTable, TitleLookup, TrailerLookupChain,
};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use serde_json::Value;
use shared::Database;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt; // for `oneshot`

const ORIGIN: &str = "http://localhost:3000";

/// Metadata source double with per-endpoint call counters
#[derive(Default)]
struct FakeJikan {
    season: Vec<AnimeEntry>,
    fail: bool,
    season_calls: AtomicUsize,
    search_calls: AtomicUsize,
    by_id_calls: AtomicUsize,
}

fn entry(mal_id: u32, title: &str, popularity: u32) -> AnimeEntry {
    AnimeEntry {
        mal_id,
        title: title.to_string(),
        popularity: Some(popularity),
        status: Some("Currently Airing".to_string()),
        ..Default::default()
    }
}

#[async_trait]
impl AnimeSource for FakeJikan {
    async fn season_now(&self, _limit: u32) -> Result<Vec<AnimeEntry>, JikanError> {
        self.season_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(JikanError::RateLimited("429 Too Many Requests".into()));
        }
        Ok(self.season.clone())
    }

    async fn search(&self, query: &str, _limit: u32) -> Result<Vec<AnimeEntry>, JikanError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(JikanError::Decode("truncated body".into()));
        }
        Ok(vec![entry(1, &format!("{} result", query), 10)])
    }

    async fn top_by_popularity(&self, _limit: u32) -> Result<Vec<AnimeEntry>, JikanError> {
        if self.fail {
            return Err(JikanError::Decode("truncated body".into()));
        }
        Ok(vec![entry(2, "Second", 2), entry(1, "First", 1)])
    }

    async fn anime_by_id(&self, mal_id: u32) -> Result<AnimeEntry, JikanError> {
        self.by_id_calls.fetch_add(1, Ordering::SeqCst);
        match mal_id {
            5114 => Ok(entry(5114, "Fullmetal Alchemist: Brotherhood", 3)),
            _ => Err(JikanError::NotFound(format!("anime {}", mal_id))),
        }
    }
}

/// Graph lookup double that knows one title
struct OneTitleLookup {
    title: &'static str,
    youtube_id: &'static str,
    calls: AtomicUsize,
}

#[async_trait]
impl TitleLookup for OneTitleLookup {
    async fn find_by_title(&self, title: &str) -> anyhow::Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok((title == self.title).then(|| self.youtube_id.to_string()))
    }

    fn name(&self) -> &'static str {
        "one-title"
    }
}

struct TestApp {
    router: axum::Router,
    jikan: Arc<FakeJikan>,
    graph: Arc<OneTitleLookup>,
}

fn setup_app(jikan: FakeJikan) -> TestApp {
    let jikan = Arc::new(jikan);
    let graph = Arc::new(OneTitleLookup {
        title: "Beta",
        youtube_id: "beta_trailer",
        calls: AtomicUsize::new(0),
    });
    let store = Arc::new(SqliteStore::new(Database::open_in_memory().unwrap()));

    let chain = Arc::new(TrailerLookupChain::new(
        graph.clone(),
        None,
        StaticTrailerTable::empty(),
        Duration::from_secs(1),
    ));

    let settings = AiringSettings {
        delay: Duration::from_millis(1),
        ..AiringSettings::default()
    };
    let feed = Arc::new(SeasonalListFetcher::new(
        jikan.clone(),
        25,
        settings.top_n,
        Duration::from_secs(5),
    ));
    let orchestrator = Arc::new(AiringListOrchestrator::new(
        ResultCache::new(store.clone()),
        feed,
        chain,
        settings,
    ));
    let service = Arc::new(AnimeService::new(jikan.clone(), store, 20, 10));

    let router = build_router(
        AppState::new(orchestrator, service),
        &[ORIGIN.to_string()],
    );

    TestApp {
        router,
        jikan,
        graph,
    }
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Should parse JSON")
    };
    (status, body)
}

fn field<'a>(body: &'a Value, name: &str) -> Vec<&'a Value> {
    body.as_array()
        .expect("array body")
        .iter()
        .map(|item| &item[name])
        .collect()
}

#[tokio::test]
async fn test_health() {
    let app = setup_app(FakeJikan::default());

    let (status, body) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "anime-api");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_top_airing_enriches_and_caches() {
    let app = setup_app(FakeJikan {
        season: vec![
            entry(1, "Alpha", 50),
            entry(2, "Beta", 10),
            entry(3, "Gamma", 9999),
            entry(4, "Delta", 30),
            entry(5, "Epsilon", 20),
        ],
        ..Default::default()
    });

    let (status, first) = send(&app, get("/anime/top-airing")).await;
    assert_eq!(status, StatusCode::OK);

    let ids: Vec<u64> = field(&first, "mal_id").iter().filter_map(|v| v.as_u64()).collect();
    assert_eq!(ids, vec![2, 5, 4, 1, 3]);
    let ranks: Vec<u64> = field(&first, "rank").iter().filter_map(|v| v.as_u64()).collect();
    assert_eq!(ranks, vec![1, 2, 3, 4, 5]);

    assert_eq!(first[0]["trailer_youtube_id"], "beta_trailer");
    assert_eq!(first[0]["trailer_url"], "https://www.youtube.com/watch?v=beta_trailer");
    assert_eq!(first[1]["trailer_youtube_id"], Value::Null);
    assert_eq!(first[0]["status"], "currently_airing");

    let (_, second) = send(&app, get("/anime/top-airing")).await;
    assert_eq!(first, second);
    assert_eq!(app.jikan.season_calls.load(Ordering::SeqCst), 1);
    assert_eq!(app.graph.calls.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn test_top_airing_falls_back_to_catalog() {
    let app = setup_app(FakeJikan {
        fail: true,
        ..Default::default()
    });

    let (status, body) = send(&app, get("/anime/top-airing")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::to_value(StaticFallbackCatalog::snapshot()).unwrap());
}

#[tokio::test]
async fn test_search_blank_query() {
    let app = setup_app(FakeJikan::default());

    let (status, body) = send(&app, get("/anime/search?q=%20%20")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Array(Vec::new()));

    let (status, body) = send(&app, get("/anime/search")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Array(Vec::new()));

    assert_eq!(app.jikan.search_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_search() {
    let app = setup_app(FakeJikan::default());

    let (status, body) = send(&app, get("/anime/search?q=frieren")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["title"], "frieren result");
    assert_eq!(body[0]["rank"], 1);
    assert_eq!(app.graph.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_search_upstream_failure_is_bad_gateway() {
    let app = setup_app(FakeJikan {
        fail: true,
        ..Default::default()
    });

    let (status, body) = send(&app, get("/anime/search?q=bleach")).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_trending() {
    let app = setup_app(FakeJikan::default());
    let (status, body) = send(&app, get("/anime/trending")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["title"], "First");
    assert_eq!(body[1]["rank"], 2);

    let failing = setup_app(FakeJikan {
        fail: true,
        ..Default::default()
    });
    let (status, body) = send(&failing, get("/anime/trending")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::to_value(StaticFallbackCatalog::trending()).unwrap());
}

#[tokio::test]
async fn test_get_anime_by_id() {
    let app = setup_app(FakeJikan::default());

    let (status, body) = send(&app, get("/anime/5114")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mal_id"], 5114);
    assert_eq!(body["title"], "Fullmetal Alchemist: Brotherhood");

    let (status, again) = send(&app, get("/anime/5114")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, again);
    assert_eq!(app.jikan.by_id_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_get_anime_errors() {
    let app = setup_app(FakeJikan::default());

    let (status, body) = send(&app, get("/anime/999999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    let (status, body) = send(&app, get("/anime/not-a-number")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("not-a-number"));
}

#[tokio::test]
async fn test_cors_preflight() {
    let app = setup_app(FakeJikan::default());

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/anime/trending")
        .header(header::ORIGIN, ORIGIN)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .body(Body::empty())
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        ORIGIN
    );
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .unwrap(),
        "true"
    );
}

use super::error::AppError;
use super::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use shared::AnimeSummary;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "anime-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
}

/// GET /anime/search?q=
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<AnimeSummary>>, AppError> {
    let query = params.q.unwrap_or_default();
    Ok(Json(state.service.search(&query).await?))
}

/// GET /anime/trending
pub async fn trending(State(state): State<AppState>) -> Json<Vec<AnimeSummary>> {
    Json(state.service.trending().await)
}

/// GET /anime/top-airing
pub async fn top_airing(State(state): State<AppState>) -> Json<Vec<AnimeSummary>> {
    Json(state.orchestrator.get_top_airing_anime().await)
}

/// GET /anime/:id
pub async fn get_anime(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AnimeSummary>, AppError> {
    let mal_id: u32 = id
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid anime id: {}", id)))?;

    Ok(Json(state.service.get_anime(mal_id).await?))
}

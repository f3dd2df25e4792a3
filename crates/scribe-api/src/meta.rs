use axum::{Json, extract::State};

use scribe_types::api::{HealthResponse, IndexResponse, StatsResponse};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn index(State(state): State<AppState>) -> Json<IndexResponse> {
    Json(IndexResponse {
        service: state.service_name.clone(),
        status: "ok".into(),
    })
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".into(),
        service: state.service_name.clone(),
        timestamp: chrono::Utc::now(),
    })
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, ApiError> {
    let counts = state.blocking(|db, _| db.count_all()).await?;
    Ok(Json(StatsResponse {
        users: counts.users,
        posts: counts.posts,
        comments: counts.comments,
        service: state.service_name.clone(),
    }))
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

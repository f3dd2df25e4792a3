use axum::{
    Extension, Json,
    extract::{Path, State, rejection::{JsonRejection, PathRejection}},
};
use tracing::info;

use scribe_db::models::CommentRow;
use scribe_types::api::{CommentResponse, CreateCommentRequest, CreateCommentResponse, non_empty};

use crate::error::ApiError;
use crate::session::SessionData;
use crate::state::AppState;

const CONTENT_REQUIRED: &str = "Content is required";

/// Only integer ids route here; anything else is treated as an unknown route.
fn post_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    path.map(|Path(id)| id).map_err(|_| ApiError::NotFound)
}

/// An unknown post id gives an empty list rather than a 404.
pub async fn list_comments(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<CommentResponse>>, ApiError> {
    let post_id = post_id(path)?;
    let rows = state.blocking(move |db, _| db.list_comments(post_id)).await?;
    Ok(Json(rows.into_iter().map(comment_response).collect()))
}

/// The post is not looked up first; a comment on a missing post is stored.
pub async fn add_comment(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    Extension(session): Extension<SessionData>,
    payload: Result<Json<CreateCommentRequest>, JsonRejection>,
) -> Result<Json<CreateCommentResponse>, ApiError> {
    let post_id = post_id(path)?;
    let Json(req) = payload.map_err(|_| ApiError::Validation(CONTENT_REQUIRED))?;

    let Some(content) = non_empty(req.content) else {
        return Err(ApiError::Validation(CONTENT_REQUIRED));
    };

    let author_id = session.user_id;
    let comment_id = state
        .blocking(move |db, _| db.create_comment(post_id, author_id, &content))
        .await?;

    info!("User {} commented {} on post {}", session.username, comment_id, post_id);

    Ok(Json(CreateCommentResponse {
        message: "Comment added successfully".into(),
        comment_id,
    }))
}

fn comment_response(row: CommentRow) -> CommentResponse {
    CommentResponse {
        id: row.id,
        post_id: row.post_id,
        author_id: row.author_id,
        content: row.content,
        created_at: row.created_at,
        author_name: row.author_name,
    }
}

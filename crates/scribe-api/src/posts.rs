use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::info;

use scribe_db::models::PostRow;
use scribe_types::api::{CreatePostRequest, CreatePostResponse, PostResponse, non_empty};

use crate::error::ApiError;
use crate::session::SessionData;
use crate::state::AppState;

const TITLE_AND_CONTENT_REQUIRED: &str = "Title and content are required";

pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let rows = state.blocking(|db, _| db.list_posts()).await?;
    Ok(Json(rows.into_iter().map(post_response).collect()))
}

pub async fn create_post(
    State(state): State<AppState>,
    Extension(session): Extension<SessionData>,
    payload: Result<Json<CreatePostRequest>, JsonRejection>,
) -> Result<Json<CreatePostResponse>, ApiError> {
    let Json(req) = payload.map_err(|_| ApiError::Validation(TITLE_AND_CONTENT_REQUIRED))?;

    let (Some(title), Some(content)) = (non_empty(req.title), non_empty(req.content)) else {
        return Err(ApiError::Validation(TITLE_AND_CONTENT_REQUIRED));
    };

    let author_id = session.user_id;
    let post_id = state
        .blocking(move |db, _| db.create_post(&title, &content, author_id))
        .await?;

    info!("User {} created post {}", session.username, post_id);

    Ok(Json(CreatePostResponse {
        message: "Post created successfully".into(),
        post_id,
    }))
}

fn post_response(row: PostRow) -> PostResponse {
    PostResponse {
        id: row.id,
        title: row.title,
        content: row.content,
        author_id: row.author_id,
        created_at: row.created_at,
        author_name: row.author_name,
    }
}

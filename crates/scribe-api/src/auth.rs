use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tower_sessions::Session;
use tracing::{info, warn};

use scribe_db::DbError;
use scribe_types::api::{
    AuthResponse, CurrentUserResponse, LoginRequest, MessageResponse, RegisterRequest,
    UserResponse, non_empty,
};

use crate::error::ApiError;
use crate::session::{SessionData, current_session, end_session, start_session};
use crate::state::AppState;

const ALL_FIELDS_REQUIRED: &str = "All fields are required";
const CREDENTIALS_REQUIRED: &str = "Username and password are required";

pub async fn register(
    State(state): State<AppState>,
    session: Session,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(req) = payload.map_err(|_| ApiError::Validation(ALL_FIELDS_REQUIRED))?;

    let (Some(username), Some(email), Some(password)) = (
        non_empty(req.username),
        non_empty(req.email),
        non_empty(req.password),
    ) else {
        return Err(ApiError::Validation(ALL_FIELDS_REQUIRED));
    };

    let (name, mail) = (username.clone(), email.clone());
    let user_id = state
        .blocking(move |db, hasher| {
            let digest = hasher.hash(&password)?;
            db.create_user(&name, &mail, &digest).map_err(|e| match e {
                DbError::Conflict(_) => ApiError::Conflict("Username or email already exists".into()),
                other => other.into(),
            })
        })
        .await
        .inspect_err(|e| {
            if matches!(e, ApiError::Conflict(_)) {
                warn!("Registration rejected, username or email taken: {}", username);
            }
        })?;

    info!("Registered user {} ({})", username, user_id);

    start_session(
        &session,
        SessionData {
            user_id,
            username: username.clone(),
        },
    )
    .await?;

    Ok(Json(AuthResponse {
        message: "User registered successfully".into(),
        user: UserResponse {
            id: user_id,
            username,
            email,
        },
    }))
}

pub async fn login(
    State(state): State<AppState>,
    session: Session,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(req) = payload.map_err(|_| ApiError::Validation(CREDENTIALS_REQUIRED))?;

    let (Some(username), Some(password)) = (non_empty(req.username), non_empty(req.password))
    else {
        return Err(ApiError::Validation(CREDENTIALS_REQUIRED));
    };

    let name = username.clone();
    let user = state
        .blocking(move |db, hasher| db.find_user_by_credentials(&name, &password, hasher))
        .await?
        .ok_or_else(|| {
            warn!("Failed login for {}", username);
            ApiError::Authentication
        })?;

    info!("User {} logged in", user.username);

    start_session(
        &session,
        SessionData {
            user_id: user.id,
            username: user.username.clone(),
        },
    )
    .await?;

    Ok(Json(AuthResponse {
        message: "Login successful".into(),
        user: UserResponse {
            id: user.id,
            username: user.username,
            email: user.email,
        },
    }))
}

pub async fn logout(session: Session) -> Result<Json<MessageResponse>, ApiError> {
    end_session(&session).await?;
    Ok(Json(MessageResponse {
        message: "Logged out successfully".into(),
    }))
}

/// Answers from the session alone; the users table is not consulted.
pub async fn current_user(session: Session) -> Result<Json<CurrentUserResponse>, ApiError> {
    let user = current_session(&session)
        .await?
        .ok_or(ApiError::Unauthorized("Not authenticated"))?;

    Ok(Json(CurrentUserResponse {
        id: user.user_id,
        username: user.username,
    }))
}

use axum::{extract::Request, middleware::Next, response::Response};
use tower_sessions::Session;

use crate::error::ApiError;
use crate::session::current_session;

/// Rejects requests without a live session and exposes the session's
/// `SessionData` to the handler as a request extension.
pub async fn require_session(
    session: Session,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = current_session(&session)
        .await?
        .ok_or(ApiError::Unauthorized("Authentication required"))?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

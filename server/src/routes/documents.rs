//! Document endpoint routes.

use axum::{
    extract::{Path, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};

use crate::auth::AuthUser;
use crate::error::Result;
use crate::handlers::{handle_fetch, handle_replace};
use crate::storage::DocumentId;
use crate::AppState;

/// Create document routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/documents/{id}", get(fetch_handler).put(replace_handler))
}

/// GET /documents/{id} - Full document content.
async fn fetch_handler(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = DocumentId::parse(&id)?;
    let content = handle_fetch(&state.store, &id).await?;
    Ok(([(CONTENT_TYPE, "application/json")], content.to_string()))
}

/// PUT /documents/{id} - Replace the document content.
async fn replace_handler(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
    body: String,
) -> Result<StatusCode> {
    let id = DocumentId::parse(&id)?;
    handle_replace(&state.store, &id, body).await?;
    Ok(StatusCode::NO_CONTENT)
}

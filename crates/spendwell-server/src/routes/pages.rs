use std::path::Path;

use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;

use crate::auth::session;
use crate::error::{AppError, AppResult};
use crate::routes::AppState;

/// GET / — the dashboard shell. The file is opaque to the server; rendering
/// happens client-side.
pub async fn index(State(state): State<AppState>, jar: CookieJar) -> AppResult<Response> {
    if session::current(&state.db, &jar)?.is_none() {
        return Ok(Redirect::to("/login/google").into_response());
    }

    let path = Path::new(&state.config.static_dir).join("index.html");
    let shell = tokio::fs::read_to_string(&path).await.map_err(|e| {
        AppError::Internal(format!("Failed to read frontend shell {}: {e}", path.display()))
    })?;
    Ok(Html(shell).into_response())
}

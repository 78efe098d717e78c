//! Static page serving
//!
//! `/` returns `<static_dir>/index.html` byte for byte; everything else under
//! `static_dir` is mounted at `/static` by the router.

use axum::extract::State;
use axum::response::Html;
use tracing::error;

use super::AppState;
use crate::error::AppError;

pub async fn serve_index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let path = state.settings.static_dir.join("index.html");

    tokio::fs::read_to_string(&path).await.map(Html).map_err(|e| {
        error!(path = %path.display(), error = %e, "Failed to read index page");
        AppError::InternalError(format!("failed to read {}: {}", path.display(), e))
    })
}

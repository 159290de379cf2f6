use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect};

use crate::AppState;

/// Redirect to the storage node's direct download URL.
/// GET /api/v0/datasets/:file_name/download
pub async fn handler(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> impl IntoResponse {
    let url = state.client().download_url(state.bucket(), &file_name);
    Redirect::temporary(&url)
}

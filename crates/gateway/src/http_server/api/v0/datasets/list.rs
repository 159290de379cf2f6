use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use client::{ClientError, FileInfo};

use crate::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse {
    pub bucket: String,
    pub files: Vec<FileInfo>,
}

/// List every file in the gateway's bucket.
/// GET /api/v0/datasets
pub async fn handler(State(state): State<AppState>) -> Result<impl IntoResponse, ListError> {
    let files = state.client().list_files(state.bucket()).await?;

    Ok((
        http::StatusCode::OK,
        Json(ListResponse {
            bucket: state.bucket().to_string(),
            files,
        }),
    )
        .into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum ListError {
    #[error(transparent)]
    Client(#[from] ClientError),
}

impl IntoResponse for ListError {
    fn into_response(self) -> Response {
        let ListError::Client(err) = self;
        (
            http::StatusCode::BAD_GATEWAY,
            Json(serde_json::json!({ "error": err.to_string() })),
        )
            .into_response()
    }
}

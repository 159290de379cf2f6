use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;

use client::ClientError;

use crate::AppState;

/// Metadata for a single stored file.
/// GET /api/v0/datasets/:file_name
pub async fn handler(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> Result<impl IntoResponse, InfoError> {
    let info = state
        .client()
        .get_file_info(state.bucket(), &file_name)
        .await?;

    Ok((http::StatusCode::OK, Json(info)).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum InfoError {
    #[error(transparent)]
    Client(#[from] ClientError),
}

impl IntoResponse for InfoError {
    fn into_response(self) -> Response {
        let InfoError::Client(err) = self;
        let status = match &err {
            ClientError::Remote {
                status: Some(status),
                ..
            } if status.as_u16() == 404 => http::StatusCode::NOT_FOUND,
            _ => http::StatusCode::BAD_GATEWAY,
        };
        (
            status,
            Json(serde_json::json!({ "error": err.to_string() })),
        )
            .into_response()
    }
}

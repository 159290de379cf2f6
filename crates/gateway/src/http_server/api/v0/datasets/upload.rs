use axum::extract::{Multipart, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use client::ClientError;

use crate::AppState;

/// Descriptive tags the client may attach to an upload. Stored nowhere
/// locally; echoed back in the response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatasetTags {
    pub name: Option<String>,
    pub domain: Option<String>,
    pub license: Option<String>,
    pub access: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    pub file_name: String,
    pub root_cid: String,
    pub encoded_size: u64,
    pub mime_type: String,
    #[serde(flatten)]
    pub tags: DatasetTags,
}

pub async fn handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, UploadError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut tags = DatasetTags::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadError::Multipart(e.to_string()))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| UploadError::Multipart(e.to_string()))?
                    .to_vec();
                file = Some((file_name, data));
            }
            "name" => tags.name = Some(text(field).await?),
            "domain" => tags.domain = Some(text(field).await?),
            "license" => tags.license = Some(text(field).await?),
            "access" => tags.access = Some(text(field).await?),
            _ => {}
        }
    }

    let (file_name, data) = file.ok_or(UploadError::NoFilePart)?;
    if file_name.is_empty() {
        return Err(UploadError::NoSelectedFile);
    }
    if !state.extension_allowed(&file_name) {
        return Err(UploadError::ExtensionNotAllowed(file_name));
    }

    // stage under a collision-resistant name; concurrent uploads of the
    // same filename must not clobber each other
    let staged = state
        .staging_dir()
        .join(format!("{}_{}", Uuid::new_v4(), file_name));
    tokio::fs::write(&staged, &data)
        .await
        .map_err(UploadError::Staging)?;

    tracing::info!(
        file = %file_name,
        size = data.len(),
        bucket = state.bucket(),
        "forwarding dataset upload"
    );

    let result = state
        .client()
        .upload_file(state.bucket(), &staged, Some(&file_name))
        .await;

    // the staged copy is never kept, whether or not the forward succeeded
    if let Err(err) = tokio::fs::remove_file(&staged).await {
        tracing::warn!(path = %staged.display(), "failed to remove staged file: {}", err);
    }

    let info = result?;

    let mime_type = mime_guess::from_path(&file_name)
        .first_or_octet_stream()
        .to_string();

    tracing::info!(file = %info.name, cid = %info.root_cid, "dataset uploaded");

    Ok((
        http::StatusCode::OK,
        Json(UploadResponse {
            message: "Dataset uploaded successfully".to_string(),
            file_name: info.name,
            root_cid: info.root_cid,
            encoded_size: info.encoded_size,
            mime_type,
            tags,
        }),
    )
        .into_response())
}

async fn text(field: axum::extract::multipart::Field<'_>) -> Result<String, UploadError> {
    field
        .text()
        .await
        .map_err(|e| UploadError::Multipart(e.to_string()))
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("No file part")]
    NoFilePart,
    #[error("No selected file")]
    NoSelectedFile,
    #[error("File type not allowed: {0}")]
    ExtensionNotAllowed(String),
    #[error("Multipart error: {0}")]
    Multipart(String),
    #[error("Failed to stage upload: {0}")]
    Staging(#[source] std::io::Error),
    #[error(transparent)]
    Client(#[from] ClientError),
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        let status = match &self {
            UploadError::NoFilePart
            | UploadError::NoSelectedFile
            | UploadError::ExtensionNotAllowed(_)
            | UploadError::Multipart(_) => http::StatusCode::BAD_REQUEST,
            UploadError::Staging(_) => http::StatusCode::INTERNAL_SERVER_ERROR,
            UploadError::Client(err) if err.is_validation() => http::StatusCode::BAD_REQUEST,
            UploadError::Client(_) => http::StatusCode::BAD_GATEWAY,
        };
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

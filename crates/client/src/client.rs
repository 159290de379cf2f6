use std::path::{Path, PathBuf};

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{multipart, Body, Client, Method, Response};
use serde::de::DeserializeOwned;
use serde_json::json;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;

use crate::error::ClientError;
use crate::types::{Bucket, FileInfo};
use crate::MIN_UPLOAD_SIZE;

/// Client for a single Akave Link node.
///
/// Holds the node's base URL and a pooled HTTP client carrying the optional
/// bearer credential. Cheap to clone; never mutated after construction.
#[derive(Debug, Clone)]
pub struct AkaveClient {
    base_url: String,
    http: Client,
}

impl AkaveClient {
    pub fn new(base_url: impl AsRef<str>, api_key: Option<&str>) -> Result<Self, ClientError> {
        let base_url = base_url.as_ref().trim_end_matches('/').to_string();

        let mut default_headers = HeaderMap::new();
        if let Some(key) = api_key {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", key))
                .map_err(|e| ClientError::Setup(e.to_string()))?;
            value.set_sensitive(true);
            default_headers.insert(AUTHORIZATION, value);
        }

        let http = Client::builder()
            .default_headers(default_headers)
            .build()
            .map_err(|e| ClientError::Setup(e.to_string()))?;

        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // Bucket operations

    pub async fn create_bucket(&self, bucket_name: &str) -> Result<Bucket, ClientError> {
        self.request(
            Method::POST,
            "/buckets",
            Some(json!({ "bucketName": bucket_name })),
            None,
        )
        .await
    }

    pub async fn list_buckets(&self) -> Result<Vec<Bucket>, ClientError> {
        self.request(Method::GET, "/buckets", None, None).await
    }

    pub async fn get_bucket(&self, bucket_name: &str) -> Result<Bucket, ClientError> {
        self.request(Method::GET, &format!("/buckets/{}", bucket_name), None, None)
            .await
    }

    // File operations

    pub async fn list_files(&self, bucket_name: &str) -> Result<Vec<FileInfo>, ClientError> {
        self.request(
            Method::GET,
            &format!("/buckets/{}/files", bucket_name),
            None,
            None,
        )
        .await
    }

    pub async fn get_file_info(
        &self,
        bucket_name: &str,
        file_name: &str,
    ) -> Result<FileInfo, ClientError> {
        self.request(
            Method::GET,
            &format!("/buckets/{}/files/{}", bucket_name, file_name),
            None,
            None,
        )
        .await
    }

    /// Upload a local file into a bucket.
    ///
    /// Preconditions are checked before any network I/O: the path must name
    /// an existing regular file of at least [`MIN_UPLOAD_SIZE`] bytes. The
    /// file body is streamed as the `file` field of a multipart form; the
    /// remote node assigns the returned identity (root CID, encoded size,
    /// stored name).
    pub async fn upload_file(
        &self,
        bucket_name: &str,
        file_path: impl AsRef<Path>,
        file_name: Option<&str>,
    ) -> Result<FileInfo, ClientError> {
        let file_path = file_path.as_ref();

        let metadata = match tokio::fs::metadata(file_path).await {
            Ok(metadata) if metadata.is_file() => metadata,
            _ => return Err(ClientError::FileNotFound(file_path.to_path_buf())),
        };
        if metadata.len() < MIN_UPLOAD_SIZE {
            return Err(ClientError::FileTooSmall(metadata.len()));
        }

        let file_name = match file_name {
            Some(name) => name.to_string(),
            None => file_path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .ok_or_else(|| ClientError::FileNotFound(file_path.to_path_buf()))?,
        };

        let file = tokio::fs::File::open(file_path).await?;
        let part = multipart::Part::stream_with_length(
            Body::wrap_stream(ReaderStream::new(file)),
            metadata.len(),
        )
        .file_name(file_name);
        let form = multipart::Form::new().part("file", part);

        tracing::debug!(
            bucket = bucket_name,
            size = metadata.len(),
            "uploading file"
        );
        self.request(
            Method::POST,
            &format!("/buckets/{}/files", bucket_name),
            None,
            Some(form),
        )
        .await
    }

    /// Download a file from a bucket into `output_dir`, creating the
    /// directory (and parents) if absent.
    ///
    /// The body is streamed to disk chunk by chunk to bound memory use. If
    /// anything fails after the destination file has been created, the
    /// partial file is removed before the error is returned.
    pub async fn download_file(
        &self,
        bucket_name: &str,
        file_name: &str,
        output_dir: impl AsRef<Path>,
        output_name: Option<&str>,
    ) -> Result<PathBuf, ClientError> {
        let output_dir = output_dir.as_ref();
        tokio::fs::create_dir_all(output_dir).await?;
        let output_path = output_dir.join(output_name.unwrap_or(file_name));

        let url = self.download_url(bucket_name, file_name);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ClientError::remote(None, e.to_string()))?;
        let mut response = Self::check_status(response).await?;

        if let Err(err) = Self::write_body(&mut response, &output_path).await {
            let _ = tokio::fs::remove_file(&output_path).await;
            return Err(err);
        }

        Ok(output_path)
    }

    /// Direct download URL for a stored file. Pure string construction, no
    /// network round trip.
    pub fn download_url(&self, bucket_name: &str, file_name: &str) -> String {
        format!(
            "{}/buckets/{}/files/{}/download",
            self.base_url, bucket_name, file_name
        )
    }

    /// Single chokepoint for every API round trip.
    ///
    /// A JSON body is sent only when the caller supplied one and no file
    /// payload is present; multipart and JSON bodies are mutually exclusive
    /// per call. Failure normalization lives here and nowhere else.
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<serde_json::Value>,
        form: Option<multipart::Form>,
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, endpoint);

        let mut builder = self.http.request(method, &url);
        builder = match (form, body) {
            (Some(form), _) => builder.multipart(form),
            (None, Some(body)) => builder.json(&body),
            (None, None) => builder,
        };

        let response = builder
            .send()
            .await
            .map_err(|e| ClientError::remote(None, e.to_string()))?;
        let response = Self::check_status(response).await?;

        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::remote(None, format!("invalid response body: {}", e)))
    }

    /// Two-tier error extraction: prefer the `error` field of a JSON error
    /// body, fall back to the transport's own status description.
    async fn check_status(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let fallback = match response.error_for_status_ref() {
            Err(err) => err.to_string(),
            Ok(_) => format!("unexpected status {}", status),
        };
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|value| {
                value
                    .get("error")
                    .and_then(|e| e.as_str())
                    .map(str::to_owned)
            })
            .unwrap_or(fallback);

        Err(ClientError::remote(Some(status), message))
    }

    async fn write_body(response: &mut Response, path: &Path) -> Result<(), ClientError> {
        let mut file = tokio::fs::File::create(path).await?;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| ClientError::remote(None, e.to_string()))?
        {
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        Ok(())
    }
}

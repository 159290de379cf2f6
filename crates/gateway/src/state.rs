use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use client::{AkaveClient, ClientError};

use crate::config::Config;

/// Shared handler state: the storage client plus the gateway's upload
/// policy. Cloned per request.
#[derive(Clone)]
pub struct AppState {
    client: AkaveClient,
    inner: Arc<StateInner>,
}

struct StateInner {
    bucket: String,
    staging_dir: PathBuf,
    allowed_extensions: HashSet<String>,
}

impl AppState {
    pub async fn from_config(config: &Config) -> Result<Self, StateSetupError> {
        tokio::fs::create_dir_all(&config.staging_dir)
            .await
            .map_err(StateSetupError::StagingDir)?;

        let client = AkaveClient::new(&config.storage_url, config.api_key.as_deref())?;

        let state = Self {
            client,
            inner: Arc::new(StateInner {
                bucket: config.bucket.clone(),
                staging_dir: config.staging_dir.clone(),
                allowed_extensions: config
                    .allowed_extensions
                    .iter()
                    .map(|ext| ext.trim().to_ascii_lowercase())
                    .collect(),
            }),
        };

        // The create call either succeeds or reports that the bucket is
        // already there; neither should stop the gateway from serving.
        match state.client.create_bucket(&state.inner.bucket).await {
            Ok(bucket) => tracing::info!(bucket = %bucket.name, "created storage bucket"),
            Err(err) => {
                tracing::warn!(bucket = %state.inner.bucket, "bucket create skipped: {}", err)
            }
        }

        Ok(state)
    }

    pub fn client(&self) -> &AkaveClient {
        &self.client
    }

    pub fn bucket(&self) -> &str {
        &self.inner.bucket
    }

    pub fn staging_dir(&self) -> &Path {
        &self.inner.staging_dir
    }

    /// Whether a filename carries an extension the gateway accepts.
    pub fn extension_allowed(&self, file_name: &str) -> bool {
        file_name
            .rsplit_once('.')
            .map(|(_, ext)| {
                self.inner
                    .allowed_extensions
                    .contains(&ext.to_ascii_lowercase())
            })
            .unwrap_or(false)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("failed to create staging directory: {0}")]
    StagingDir(#[source] std::io::Error),
    #[error("failed to set up storage client: {0}")]
    Client(#[from] ClientError),
}

use std::time::Duration;

use axum::extract::Path;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tokio::process::Command;

const FETCH_COMMAND: &str = "lassie";
const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub cid: String,
    pub retrievable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Check whether a CID is retrievable from the public network by running a
/// `lassie fetch` against it. A missing binary or a timeout counts as not
/// retrievable rather than a server error.
/// GET /api/v0/cid/:cid/verify
pub async fn handler(Path(cid): Path<String>) -> Response {
    let (retrievable, reason) = check_retrievable(FETCH_COMMAND, &cid, FETCH_TIMEOUT).await;

    tracing::info!(cid = %cid, retrievable, "cid retrieval check");

    (
        http::StatusCode::OK,
        Json(VerifyResponse {
            cid,
            retrievable,
            reason,
        }),
    )
        .into_response()
}

async fn check_retrievable(program: &str, cid: &str, fetch_timeout: Duration) -> (bool, Option<String>) {
    // kill_on_drop: when the timeout fires the output future is dropped,
    // and the fetch process must die with it instead of downloading
    // unsupervised
    let fetch = Command::new(program)
        .args(["fetch", "-o", "/dev/null", cid])
        .kill_on_drop(true)
        .output();

    match tokio::time::timeout(fetch_timeout, fetch).await {
        Ok(Ok(output)) if output.status.success() => (true, None),
        Ok(Ok(output)) => (
            false,
            Some(String::from_utf8_lossy(&output.stderr).trim().to_string()),
        ),
        Ok(Err(err)) => (false, Some(format!("failed to run {}: {}", program, err))),
        Err(_) => (false, Some("retrieval timed out".to_string())),
    }
}

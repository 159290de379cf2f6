use axum::routing::get;
use axum::Router;

mod healthz;
mod version;

use crate::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/healthz", get(healthz::handler))
        .route("/version", get(version::handler))
        .with_state(state)
}

use axum::Router;

pub mod cid;
pub mod datasets;

use crate::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/datasets", datasets::router(state.clone()))
        .nest("/cid", cid::router(state.clone()))
        .with_state(state)
}

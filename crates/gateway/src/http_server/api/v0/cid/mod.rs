use axum::routing::get;
use axum::Router;

use crate::AppState;

pub mod verify;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/:cid/verify", get(verify::handler))
        .with_state(state)
}

use axum::routing::get;
use axum::Router;

use crate::AppState;

pub mod download;
pub mod info;
pub mod list;
pub mod upload;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list::handler).post(upload::handler))
        .route("/:file_name", get(info::handler))
        .route("/:file_name/download", get(download::handler))
        .with_state(state)
}

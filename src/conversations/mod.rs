mod resolve;

use axum::{Router, routing::get};

use crate::AppState;

pub use resolve::{CounterpartSummary, Resolution, resolve_conversations};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{username}/conversation", get(resolve::conversations))
}

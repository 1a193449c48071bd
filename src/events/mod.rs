mod explore;

use axum::{Router, routing::get};

use crate::AppState;

pub use explore::{EventListing, list_events};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(explore::events))
        .route("/{id}", get(explore::event))
}

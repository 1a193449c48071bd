mod admin;
mod page;

use axum::{Router, routing::get};

use crate::AppState;

pub use page::{ProfileView, load_profile};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin", get(admin::admin))
        .route("/profile", get(page::profile))
}

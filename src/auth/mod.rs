//! Login through the Civic identity provider.
//!
//! Standard authorization code flow with PKCE. The session ends up holding an
//! [`AuthUser`](crate::session::AuthUser) that the gated pages read.

mod callback;
mod clients;
mod login;
mod logout;

use axum::{Router, routing::get};

use crate::AppState;

pub use clients::Clients;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", get(login::login))
        .route("/auth/callback", get(callback::callback))
        .route("/auth/logout", get(logout::logout))
        .route("/logout", get(logout::logout))
}

/// Only same-site paths are followed after login or logout.
pub(crate) fn local_path(url: Option<String>) -> Option<String> {
    url.filter(|url| url.starts_with('/') && !url.starts_with("//") && !url.contains('\\'))
}

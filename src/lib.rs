pub mod auth;
pub mod config;
pub mod conversations;
pub mod events;
pub mod index;
pub mod profiles;
pub mod res;
pub mod schema;
pub mod session;
pub mod store;

use std::{sync::Arc, time::Duration};

use axum::{
    Json, Router,
    extract::FromRef,
    http::{Method, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use thiserror::Error;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, SessionStore, cookie::SameSite};
use tracing::error;

use config::Config;
use schema::SchemaError;
use store::{FetchError, Store};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub store: Store,
    pub clients: auth::Clients,
    pub config: Arc<Config>,
}

pub fn app(state: AppState) -> Router {
    app_with_sessions(state, MemoryStore::default())
}

/// The full router on top of a given session store.
pub fn app_with_sessions<S: SessionStore + Clone>(state: AppState, sessions: S) -> Router {
    let session_layer = SessionManagerLayer::new(sessions)
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(state.config.session_minutes)));

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/", get(index::welcome))
        .route("/status", post(index::status))
        .route("/collections", get(index::collections))

        .merge(auth::router())
        .merge(profiles::router())
        .merge(conversations::router())
        .nest("/events", events::router())

        .with_state(state)
        .layer(session_layer)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("User not found")]
    UserNotFound,

    /// The user record exists but carries no `_id`.
    #[error("key not found")]
    MissingIdentifier,

    #[error("invalid field `{field}`")]
    Validation { field: String },

    #[error("{0}")]
    BadRequest(&'static str),

    #[error("invalid identifier `{0}`")]
    InvalidIdentifier(String),

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    Unavailable(&'static str),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        use AppError::*;
        match self {
            UserNotFound | NotFound(_) => StatusCode::NOT_FOUND,
            MissingIdentifier | Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            InvalidIdentifier(_) | BadRequest(_) => StatusCode::BAD_REQUEST,
            Unauthenticated => StatusCode::UNAUTHORIZED,
            Forbidden(_) => StatusCode::FORBIDDEN,
            Validation { .. } | Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Internal(err) => error!("{err}\n\n{}", err.backtrace()),
            AppError::Validation { field } => error!("stored record failed validation on `{field}`"),
            _ => {}
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<String> for AppError {
    fn from(err: String) -> Self {
        Self::Internal(anyhow::Error::msg(err))
    }
}

impl From<&str> for AppError {
    fn from(err: &str) -> Self {
        Self::Internal(anyhow::Error::msg(err.to_owned()))
    }
}

impl From<SchemaError> for AppError {
    fn from(err: SchemaError) -> Self {
        match err {
            SchemaError::Field(field) => AppError::Validation { field },
            SchemaError::InvalidIdentifier(id) => AppError::InvalidIdentifier(id),
        }
    }
}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Store(err) => AppError::Internal(err),
            FetchError::Schema(err) => err.into(),
        }
    }
}

macro_rules! apperr_impl {
    ($E:ty) => {
        impl From<$E> for AppError {
            fn from(err: $E) -> Self {
                Self::Internal(anyhow::Error::from(err))
            }
        }
    };
}

apperr_impl!(serde_json::Error);
apperr_impl!(mongodb::error::Error);
apperr_impl!(tower_sessions::session::Error);
apperr_impl!(reqwest::Error);
apperr_impl!(oauth2::url::ParseError);

impl<E: core::error::Error + Send + Sync + 'static, R: oauth2::ErrorResponse + Send + Sync + 'static> From<oauth2::RequestTokenError<E, R>> for AppError {
    fn from(err: oauth2::RequestTokenError<E, R>) -> Self {
        Self::Internal(anyhow::Error::from(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses() {
        assert_eq!(AppError::UserNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::MissingIdentifier.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(AppError::InvalidIdentifier("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::BadRequest("OAuth: without state").status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Forbidden("csrf tokens don't match").status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::from("boom").status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn messages_match_the_wire_format() {
        assert_eq!(AppError::UserNotFound.to_string(), "User not found");
        assert_eq!(AppError::MissingIdentifier.to_string(), "key not found");
        assert_eq!(AppError::from(SchemaError::Field("email".into())).to_string(), "invalid field `email`");
    }
}

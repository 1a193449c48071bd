use axum::{
    Json, debug_handler,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::debug;

use crate::{AppError, AppResult, AppState, session, store::Store};

#[debug_handler]
pub async fn welcome() -> &'static str {
    "Welcome to the API!"
}

#[debug_handler]
pub async fn status(headers: HeaderMap) -> impl IntoResponse {
    debug!(?headers, "status check");
    (StatusCode::OK, Json(json!({ "message": "Server is running" })))
}

#[debug_handler(state = AppState)]
pub async fn collections(
    State(store): State<Store>,
    session: Session,
) -> AppResult<Json<Value>> {
    if session::current_user(&session).await?.is_none() {
        return Err(AppError::Unauthenticated);
    }

    let collections = store.collection_names().await?;
    Ok(Json(json!({ "collections": collections })))
}

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::AppResult;

pub const CSRF_STATE: &str = "csrf_state";
pub const PKCE_VERIFIER: &str = "pkce_verifier";
pub const RETURN_URL: &str = "return_url";
pub const AUTH_USER: &str = "auth_user";

/// Who the identity provider says is logged in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
}

pub async fn current_user(session: &Session) -> AppResult<Option<AuthUser>> {
    Ok(session.get::<AuthUser>(AUTH_USER).await?)
}

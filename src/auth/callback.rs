use axum::{
    debug_handler,
    extract::{Query, State},
    response::Redirect,
};
use oauth2::{AuthorizationCode, CsrfToken, PkceCodeVerifier, TokenResponse};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::info;

use crate::{
    AppError, AppResult, AppState,
    session::{AUTH_USER, AuthUser, CSRF_STATE, PKCE_VERIFIER, RETURN_URL},
};

use super::{Clients, local_path};

#[derive(Deserialize)]
pub(crate) struct CallbackQuery {
    pub(crate) state: Option<String>,
    pub(crate) code: Option<String>,
}

#[derive(Deserialize)]
struct UserInfo {
    id: Option<String>,
    sub: Option<String>,
    email: Option<String>,
}

impl UserInfo {
    fn into_auth_user(self) -> AppResult<AuthUser> {
        Ok(AuthUser {
            id: self.id.or(self.sub).ok_or("userinfo without id")?,
            email: self.email.ok_or("userinfo without email")?,
        })
    }
}

#[debug_handler(state = AppState)]
pub(crate) async fn callback(
    Query(CallbackQuery { state, code }): Query<CallbackQuery>,
    State(clients): State<Clients>,
    session: Session,
) -> AppResult<Redirect> {
    let client = clients.get_client()?;

    let state = CsrfToken::new(state.ok_or(AppError::BadRequest("OAuth: without state"))?);
    let code = AuthorizationCode::new(code.ok_or(AppError::BadRequest("OAuth: without code"))?);

    // no login was started from this session
    let Some(stored_state) = session.remove::<String>(CSRF_STATE).await? else {
        return Err(AppError::BadRequest("no csrf_state"));
    };
    if state.secret().as_str() != stored_state.as_str() {
        return Err(AppError::Forbidden("csrf tokens don't match"));
    }

    let Some(pkce_verifier) = session.remove::<String>(PKCE_VERIFIER).await? else {
        return Err(AppError::BadRequest("no pkce_verifier"));
    };

    let http_client = reqwest::ClientBuilder::new()
        .redirect(reqwest::redirect::Policy::none())
        .build()?;
    let token_result = client
        .exchange_code(code)
        .set_pkce_verifier(PkceCodeVerifier::new(pkce_verifier))
        .request_async(&http_client)
        .await?;

    let user = http_client
        .get(&clients.userinfo_url)
        .bearer_auth(token_result.access_token().secret())
        .send()
        .await?
        .error_for_status()?
        .json::<UserInfo>()
        .await?
        .into_auth_user()?;

    info!("welcome {}", user.id);
    session.insert(AUTH_USER, user).await?;

    let return_url = local_path(session.remove::<String>(RETURN_URL).await?);
    Ok(Redirect::to(return_url.as_deref().unwrap_or("/admin")))
}

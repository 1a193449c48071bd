use axum::{
    Json, debug_handler,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};

use crate::{
    AppError, AppResult, AppState,
    schema::{Conversation, FromDocument, Id, User},
    store::{Collection, DocumentStore, Filter, Store, fetch_many, fetch_one},
};

/// The other side of one of the user's conversations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CounterpartSummary {
    #[serde(rename = "conv_id")]
    pub conversation_id: Id,
    #[serde(rename = "sender_id")]
    pub counterpart_id: Id,
    #[serde(rename = "sender_name")]
    pub counterpart_name: Option<String>,
    #[serde(rename = "sender_username")]
    pub counterpart_username: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum Resolution {
    /// The user takes part in no conversation at all.
    NoConversations,
    /// One entry per conversation whose counterpart still exists, in store
    /// order.
    Resolved(Vec<CounterpartSummary>),
}

/// Finds every conversation `username` takes part in and who is on the other
/// side of each.
pub async fn resolve_conversations(store: &dyn DocumentStore, username: &str) -> AppResult<Resolution> {
    let Some(doc) = store.find_one(Collection::Users, Filter::eq("username", username)).await? else {
        return Err(AppError::UserNotFound);
    };
    if doc.get("_id").is_none() {
        return Err(AppError::MissingIdentifier);
    }
    let user = User::from_document(&doc)?;

    let participant = Filter::or([Filter::id("user1", user.id), Filter::id("user2", user.id)]);
    let conversations: Vec<Conversation> = fetch_many(store, participant).await?;
    if conversations.is_empty() {
        return Ok(Resolution::NoConversations);
    }

    let mut summaries = Vec::with_capacity(conversations.len());
    for conversation in conversations {
        let counterpart_id = conversation.counterpart(user.id);
        let Some(counterpart) = fetch_one::<User>(store, Filter::id("_id", counterpart_id)).await? else {
            debug!(conversation = %conversation.id, %counterpart_id, "counterpart is gone, skipping");
            continue;
        };

        summaries.push(CounterpartSummary {
            conversation_id: conversation.id,
            counterpart_id,
            counterpart_name: counterpart.name,
            counterpart_username: counterpart.username,
        });
    }

    Ok(Resolution::Resolved(summaries))
}

#[debug_handler(state = AppState)]
pub(crate) async fn conversations(
    Path(username): Path<String>,
    State(store): State<Store>,
) -> AppResult<Response> {
    match resolve_conversations(store.as_ref(), &username).await? {
        Resolution::NoConversations => {
            info!("{username} has no conversations");
            Ok((StatusCode::NO_CONTENT, Json(json!({ "warning": "Conversation not found" }))).into_response())
        }
        Resolution::Resolved(summaries) => Ok(Json(summaries).into_response()),
    }
}

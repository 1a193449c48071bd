use serde::{Deserialize, Serialize};

use crate::store::Collection;

use super::{FromDocument, Id};

/// A two party conversation. The pair is unordered and not deduplicated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    #[serde(rename(deserialize = "_id"))]
    pub id: Id,
    pub user1: Id,
    pub user2: Id,
}

impl Conversation {
    /// The participant that is not `user`. A conversation with oneself has
    /// oneself as counterpart.
    pub fn counterpart(&self, user: Id) -> Id {
        if self.user1 == user {
            self.user2
        } else {
            self.user1
        }
    }
}

impl FromDocument for Conversation {
    const COLLECTION: Collection = Collection::Conversations;
}

use serde::{Deserialize, Serialize};

use crate::store::Collection;

use super::{FromDocument, Id, fields};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(rename(deserialize = "_id"))]
    pub id: Id,
    pub sender_id: Id,
    pub receiver_id: Id,
    /// Kept as stored. Whether a message can belong to more than one
    /// conversation is undecided, nothing here fans out over it.
    #[serde(default, deserialize_with = "fields::nullable_list")]
    pub conversation_id: Vec<Id>,
    pub content: String,
}

impl FromDocument for Message {
    const COLLECTION: Collection = Collection::Messages;
}

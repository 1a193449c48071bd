use serde::{Deserialize, Serialize};

use crate::store::Collection;

use super::{FromDocument, Id};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Badge {
    #[serde(rename(deserialize = "_id"))]
    pub id: Id,
    pub name: String,
    pub description: String,
    pub url: String,
}

impl FromDocument for Badge {
    const COLLECTION: Collection = Collection::Badges;
}

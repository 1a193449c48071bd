use serde::{Deserialize, Serialize};

use crate::store::Collection;

use super::{Category, FromDocument, Id, fields};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    #[serde(rename(deserialize = "_id"))]
    pub id: Id,
    pub category: Category,
    pub locality: Option<String>,
    #[serde(default, deserialize_with = "fields::nullable_list")]
    pub events: Vec<Id>,
}

impl FromDocument for Organization {
    const COLLECTION: Collection = Collection::Organizations;
}

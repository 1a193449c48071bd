use serde::{Deserialize, Serialize};

use crate::store::Collection;

use super::{FromDocument, Id, Skill, fields};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Volunteer {
    #[serde(rename(deserialize = "_id"))]
    pub id: Id,
    #[serde(deserialize_with = "fields::enum_list")]
    pub skills: Vec<Skill>,
    #[serde(default, deserialize_with = "fields::nullable_list")]
    pub experience: Vec<Id>,
    #[serde(default, deserialize_with = "fields::nullable_list")]
    pub badges: Vec<Id>,
}

impl FromDocument for Volunteer {
    const COLLECTION: Collection = Collection::Volunteers;
}

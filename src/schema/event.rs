use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::store::Collection;

use super::{FromDocument, Id, Skill, fields};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename(deserialize = "_id"))]
    pub id: Id,
    pub name: String,
    pub description: String,
    #[serde(deserialize_with = "fields::whole_number")]
    pub volunteer_cap: i64,
    pub location: String,
    #[serde(deserialize_with = "fields::enum_list")]
    pub required_skills: Vec<Skill>,
    #[serde(serialize_with = "time::serde::rfc3339::serialize", deserialize_with = "fields::datetime")]
    pub start_time: OffsetDateTime,
    #[serde(serialize_with = "time::serde::rfc3339::serialize", deserialize_with = "fields::datetime")]
    pub end_time: OffsetDateTime,
    #[serde(default, deserialize_with = "fields::nullable_list")]
    pub joined_volunteers: Vec<Id>,
}

impl FromDocument for Event {
    const COLLECTION: Collection = Collection::Events;
}

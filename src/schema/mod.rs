//! Typed records for everything the store holds.
//!
//! Documents come out of the store as loose maps. Each record type is a serde
//! model decoded straight from the document; a failure names the first field
//! that is missing or malformed.

mod badge;
mod conversation;
mod enums;
mod event;
pub(crate) mod fields;
mod id;
mod message;
mod organization;
mod user;
mod volunteer;

use mongodb::bson::{self, Bson, Document};
use serde::de::DeserializeOwned;
use serde_path_to_error::Segment;
use thiserror::Error;

use crate::store::Collection;

pub use badge::Badge;
pub use conversation::Conversation;
pub use enums::{Category, Skill, UserType};
pub use event::Event;
pub use id::{ID_HEX_LEN, Id};
pub use message::Message;
pub use organization::Organization;
pub use user::User;
pub use volunteer::Volunteer;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("invalid field `{0}`")]
    Field(String),

    #[error("invalid identifier `{0}`")]
    InvalidIdentifier(String),
}

pub trait FromDocument: DeserializeOwned {
    const COLLECTION: Collection;

    fn from_document(doc: &Document) -> Result<Self, SchemaError> {
        decode(doc)
    }
}

/// Decodes any model from a stored document, reporting which field broke.
pub fn decode<T: DeserializeOwned>(doc: &Document) -> Result<T, SchemaError> {
    let deserializer = bson::Deserializer::new(Bson::Document(doc.clone()));
    serde_path_to_error::deserialize(deserializer).map_err(|err| {
        let field = match err.path().iter().next() {
            Some(Segment::Map { key }) => key.clone(),
            // a missing field fails on the record itself, serde names it in the message
            _ => missing_field(&err.inner().to_string()).unwrap_or_else(|| "document".to_owned()),
        };
        SchemaError::Field(field)
    })
}

fn missing_field(message: &str) -> Option<String> {
    let rest = &message[message.find("missing field `")? + "missing field `".len()..];
    Some(rest[..rest.find('`')?].to_owned())
}

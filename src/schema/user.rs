use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::store::Collection;

use super::{FromDocument, Id, UserType, fields};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename(deserialize = "_id"))]
    pub id: Id,
    // older records spell these `Name` and `oidcId`
    #[serde(alias = "Name")]
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: String,
    /// Subject id at the identity provider.
    #[serde(alias = "oidcId")]
    pub civic_id: String,
    #[serde(default, deserialize_with = "fields::flag")]
    pub onboarded: bool,
    pub bio: Option<String>,
    #[serde(rename = "type")]
    pub user_type: Option<UserType>,
    /// Volunteer or Organization record holding the role specific data.
    pub data: Option<Id>,
    #[serde(
        default,
        serialize_with = "time::serde::rfc3339::option::serialize",
        deserialize_with = "fields::opt_datetime"
    )]
    pub created_at: Option<OffsetDateTime>,
    #[serde(
        default,
        serialize_with = "time::serde::rfc3339::option::serialize",
        deserialize_with = "fields::opt_datetime"
    )]
    pub updated_at: Option<OffsetDateTime>,
}

impl FromDocument for User {
    const COLLECTION: Collection = Collection::Users;
}

#[cfg(test)]
mod tests {
    use mongodb::bson::{DateTime, Document, doc, oid::ObjectId};

    use crate::schema::SchemaError;

    use super::*;

    fn alice() -> Document {
        doc! {
            "_id": ObjectId::parse_str("aaaa00000000000000000001").unwrap(),
            "name": "Alice",
            "username": "alice123",
            "email": "alice@example.com",
            "civicId": "civic-alice",
            "type": "volunteer",
            "createdAt": DateTime::from_millis(0),
        }
    }

    #[test]
    fn reads_a_full_record() {
        let user = User::from_document(&alice()).unwrap();
        assert_eq!(user.id.to_string(), "aaaa00000000000000000001");
        assert_eq!(user.name.as_deref(), Some("Alice"));
        assert_eq!(user.user_type, Some(UserType::Volunteer));
        assert!(!user.onboarded);
        assert_eq!(user.created_at, Some(OffsetDateTime::UNIX_EPOCH));
    }

    #[test]
    fn accepts_legacy_spellings() {
        let mut doc = alice();
        doc.remove("name");
        doc.remove("civicId");
        doc.insert("Name", "Alice L.");
        doc.insert("oidcId", "oidc-alice");

        let user = User::from_document(&doc).unwrap();
        assert_eq!(user.name.as_deref(), Some("Alice L."));
        assert_eq!(user.civic_id, "oidc-alice");
    }

    #[test]
    fn missing_required_fields() {
        let mut doc = alice();
        doc.remove("email");
        assert_eq!(User::from_document(&doc), Err(SchemaError::Field("email".into())));

        let mut doc = alice();
        doc.remove("civicId");
        assert_eq!(User::from_document(&doc), Err(SchemaError::Field("civicId".into())));

        let mut doc = alice();
        doc.remove("_id");
        assert_eq!(User::from_document(&doc), Err(SchemaError::Field("_id".into())));
    }

    #[test]
    fn type_outside_the_closed_set() {
        let mut doc = alice();
        doc.insert("type", "organization");
        assert_eq!(User::from_document(&doc), Err(SchemaError::Field("type".into())));
    }
}

use std::{fmt, str::FromStr};

use mongodb::bson::{oid::ObjectId, Bson};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error};

use super::SchemaError;

/// Length of the hex form of a document id.
pub const ID_HEX_LEN: usize = 24;

/// A document id.
///
/// Inside the store this is a native `ObjectId`; at every API boundary it is
/// the 24 character hex string. Parsing is strict, anything else is
/// [`SchemaError::InvalidIdentifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(ObjectId);

impl Id {
    pub fn new() -> Self {
        Id(ObjectId::new())
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }

    /// Reads an id out of a stored value, accepting the native type or its
    /// string form.
    pub fn from_bson(value: &Bson) -> Result<Id, SchemaError> {
        match value {
            Bson::ObjectId(oid) => Ok(Id(*oid)),
            Bson::String(s) => s.parse(),
            other => Err(SchemaError::InvalidIdentifier(other.to_string())),
        }
    }
}

impl Default for Id {
    fn default() -> Self {
        Id::new()
    }
}

impl FromStr for Id {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != ID_HEX_LEN || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(SchemaError::InvalidIdentifier(s.to_owned()));
        }

        ObjectId::parse_str(s)
            .map(Id)
            .map_err(|_| SchemaError::InvalidIdentifier(s.to_owned()))
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Id::from_bson(&Bson::deserialize(deserializer)?).map_err(D::Error::custom)
    }
}

impl From<ObjectId> for Id {
    fn from(oid: ObjectId) -> Self {
        Id(oid)
    }
}

impl From<Id> for ObjectId {
    fn from(id: Id) -> Self {
        id.0
    }
}

impl From<Id> for Bson {
    fn from(id: Id) -> Self {
        Bson::ObjectId(id.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_round_trip() {
        let id = Id::new();
        let back: Id = id.to_string().parse().unwrap();
        assert_eq!(id, back);
    }

    #[test]
    fn parses_known_hex() {
        let id: Id = "aaaa00000000000000000001".parse().unwrap();
        assert_eq!(id.to_string(), "aaaa00000000000000000001");
    }

    #[test]
    fn rejects_wrong_shapes() {
        for bad in [
            "",
            "alice123",
            "aaaa0000000000000000001",
            "aaaa000000000000000000011",
            "zzzz00000000000000000001",
            " aaa00000000000000000001",
        ] {
            assert!(
                matches!(bad.parse::<Id>(), Err(SchemaError::InvalidIdentifier(s)) if s == bad),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn reads_native_and_string_bson() {
        let oid = ObjectId::new();
        assert_eq!(Id::from_bson(&Bson::ObjectId(oid)).unwrap().object_id(), oid);
        assert_eq!(Id::from_bson(&Bson::String(oid.to_hex())).unwrap().object_id(), oid);
        assert!(Id::from_bson(&Bson::Int32(7)).is_err());
    }

    #[test]
    fn serializes_as_hex_string() {
        let id: Id = "bbbb00000000000000000002".parse().unwrap();
        assert_eq!(serde_json::to_value(id).unwrap(), serde_json::json!("bbbb00000000000000000002"));
    }
}

//! Access to the document database.
//!
//! Handlers only see [`DocumentStore`]; the process wires in [`MongoStore`]
//! at startup and tests use [`InMemoryStore`].

mod memory;
mod mongo;

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use mongodb::bson::{Bson, Document};

use crate::schema::{FromDocument, Id, SchemaError};

pub use memory::InMemoryStore;
pub use mongo::MongoStore;

pub type Store = Arc<dyn DocumentStore>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Users,
    Conversations,
    Volunteers,
    Organizations,
    Events,
    Messages,
    Badges,
}

impl Collection {
    pub fn name(&self) -> &'static str {
        use Collection::*;
        match self {
            Users => "users",
            Conversations => "conversations",
            Volunteers => "volunteers",
            Organizations => "organizations",
            Events => "events",
            Messages => "messages",
            Badges => "badges",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Equality filters, the only kind of query anything here runs.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    All,
    /// Field equals value. Against an array field it matches when the array
    /// contains the value.
    Eq(&'static str, Bson),
    Or(Vec<Filter>),
}

impl Filter {
    pub fn eq(field: &'static str, value: impl Into<Bson>) -> Filter {
        Filter::Eq(field, value.into())
    }

    /// Matches an id field whether it was stored natively or as its hex
    /// string. Every lookup by id goes through here.
    pub fn id(field: &'static str, id: Id) -> Filter {
        Filter::or([Filter::Eq(field, Bson::from(id)), Filter::Eq(field, Bson::String(id.to_string()))])
    }

    pub fn or(filters: impl IntoIterator<Item = Filter>) -> Filter {
        Filter::Or(filters.into_iter().collect())
    }

    pub fn to_document(&self) -> Document {
        let mut query = Document::new();
        match self {
            Filter::All => {}
            Filter::Eq(field, value) => {
                query.insert(*field, value.clone());
            }
            Filter::Or(filters) => {
                let filters: Vec<Bson> = filters.iter().map(|f| Bson::Document(f.to_document())).collect();
                query.insert("$or", filters);
            }
        }
        query
    }

    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq(field, value) => match doc.get(*field) {
                Some(Bson::Array(items)) if !matches!(value, Bson::Array(_)) => items.contains(value),
                Some(found) => found == value,
                None => *value == Bson::Null,
            },
            Filter::Or(filters) => filters.iter().any(|f| f.matches(doc)),
        }
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_one(&self, collection: Collection, filter: Filter) -> anyhow::Result<Option<Document>>;

    /// Every match, in the order the backend returns them.
    async fn find_many(&self, collection: Collection, filter: Filter) -> anyhow::Result<Vec<Document>>;

    async fn collection_names(&self) -> anyhow::Result<Vec<String>>;
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error(transparent)]
    Store(#[from] anyhow::Error),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Typed lookups on top of the raw document interface.
pub async fn fetch_one<T: FromDocument>(store: &dyn DocumentStore, filter: Filter) -> Result<Option<T>, FetchError> {
    match store.find_one(T::COLLECTION, filter).await? {
        Some(doc) => Ok(Some(T::from_document(&doc)?)),
        None => Ok(None),
    }
}

pub async fn fetch_many<T: FromDocument>(store: &dyn DocumentStore, filter: Filter) -> Result<Vec<T>, FetchError> {
    let docs = store.find_many(T::COLLECTION, filter).await?;
    Ok(docs.iter().map(T::from_document).collect::<Result<_, _>>()?)
}

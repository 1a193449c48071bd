use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
};

use anyhow::anyhow;
use async_trait::async_trait;
use mongodb::bson::Document;

use super::{Collection, DocumentStore, Filter};

/// Store kept entirely in memory. Documents come back in insertion order.
#[derive(Default)]
pub struct InMemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
}

impl InMemoryStore {
    pub fn new() -> InMemoryStore {
        InMemoryStore::default()
    }

    pub fn with(mut self, collection: Collection, docs: impl IntoIterator<Item = Document>) -> InMemoryStore {
        self.collections
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(collection)
            .or_default()
            .extend(docs);
        self
    }

    pub fn insert(&self, collection: Collection, doc: Document) -> anyhow::Result<()> {
        self.collections
            .write()
            .map_err(|_| anyhow!("in-memory store lock poisoned"))?
            .entry(collection)
            .or_default()
            .push(doc);
        Ok(())
    }

    fn scan(&self, collection: Collection, filter: &Filter, limit: usize) -> anyhow::Result<Vec<Document>> {
        let collections = self
            .collections
            .read()
            .map_err(|_| anyhow!("in-memory store lock poisoned"))?;

        Ok(collections
            .get(&collection)
            .map(|docs| docs.iter().filter(|doc| filter.matches(doc)).take(limit).cloned().collect())
            .unwrap_or_default())
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn find_one(&self, collection: Collection, filter: Filter) -> anyhow::Result<Option<Document>> {
        Ok(self.scan(collection, &filter, 1)?.pop())
    }

    async fn find_many(&self, collection: Collection, filter: Filter) -> anyhow::Result<Vec<Document>> {
        self.scan(collection, &filter, usize::MAX)
    }

    async fn collection_names(&self) -> anyhow::Result<Vec<String>> {
        let collections = self
            .collections
            .read()
            .map_err(|_| anyhow!("in-memory store lock poisoned"))?;

        let mut names: Vec<String> = collections.keys().map(|c| c.name().to_owned()).collect();
        names.sort();
        Ok(names)
    }
}

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Client, Database,
    bson::{Document, doc},
};
use tracing::{debug, info};

use super::{Collection, DocumentStore, Filter};

#[derive(Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    /// Connects and pings once so a bad url fails at startup.
    pub async fn connect(url: &str, db_name: &str) -> anyhow::Result<MongoStore> {
        let client = Client::with_uri_str(url).await?;
        let db = client.database(db_name);
        db.run_command(doc! { "ping": 1 }).await?;
        info!("connected to database {db_name}");

        Ok(MongoStore { db })
    }

    fn collection(&self, collection: Collection) -> mongodb::Collection<Document> {
        self.db.collection(collection.name())
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn find_one(&self, collection: Collection, filter: Filter) -> anyhow::Result<Option<Document>> {
        let filter = filter.to_document();
        debug!(%collection, %filter, "find_one");
        Ok(self.collection(collection).find_one(filter).await?)
    }

    async fn find_many(&self, collection: Collection, filter: Filter) -> anyhow::Result<Vec<Document>> {
        let filter = filter.to_document();
        debug!(%collection, %filter, "find_many");
        let cursor = self.collection(collection).find(filter).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn collection_names(&self) -> anyhow::Result<Vec<String>> {
        Ok(self.db.list_collection_names().await?)
    }
}

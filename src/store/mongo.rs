//! MongoDB-backed document collection.

use std::time::Duration;

use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, IndexModel};
use tracing::info;

use super::DocumentStore;
use crate::cache::CacheRecord;
use crate::config::ConnectionSpec;
use crate::error::{CacheError, Result};

fn unavailable(e: mongodb::error::Error) -> CacheError {
    CacheError::StoreUnavailable(e.to_string())
}

// == Mongo Store ==
/// A MongoDB collection of `{ key, value, time }` documents.
///
/// The client is created once in [`MongoStore::connect`] and shared by every
/// operation; the driver manages its own connection pool.
#[derive(Debug, Clone)]
pub struct MongoStore {
    collection: Collection<CacheRecord>,
}

impl MongoStore {
    /// Connects to the collection named by `spec`.
    ///
    /// The server is pinged and a unique index on `key` is ensured before
    /// returning, so an unreachable store fails here with
    /// [`CacheError::StoreUnavailable`] instead of on the first request.
    /// `timeout` bounds server selection and connection setup.
    pub async fn connect(spec: &ConnectionSpec, timeout: Duration) -> Result<Self> {
        let uri = format!("mongodb://{}:{}", spec.host, spec.port);
        let mut options = ClientOptions::parse(uri.as_str()).await.map_err(unavailable)?;
        options.app_name = Some("doc_cache".to_string());
        options.server_selection_timeout = Some(timeout);
        options.connect_timeout = Some(timeout);

        let client = Client::with_options(options).map_err(unavailable)?;
        let database = client.database(&spec.database);
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(unavailable)?;

        let collection = database.collection::<CacheRecord>(&spec.collection);
        let key_index = IndexModel::builder()
            .keys(doc! { "key": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        collection.create_index(key_index).await.map_err(unavailable)?;

        info!("Connected to MongoDB collection {} at {}:{}", spec.namespace(), spec.host, spec.port);
        Ok(Self { collection })
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn find_by_key(&self, key: &str) -> Result<Option<CacheRecord>> {
        self.collection
            .find_one(doc! { "key": key })
            .await
            .map_err(unavailable)
    }

    async fn upsert(&self, record: CacheRecord) -> Result<()> {
        let filter = doc! { "key": record.key.as_str() };
        self.collection
            .replace_one(filter, &record)
            .upsert(true)
            .await
            .map_err(unavailable)?;
        Ok(())
    }

    async fn delete_by_key(&self, key: &str) -> Result<()> {
        self.collection
            .delete_one(doc! { "key": key })
            .await
            .map_err(unavailable)?;
        Ok(())
    }

    async fn scan_all(&self) -> Result<Vec<CacheRecord>> {
        let mut cursor = self.collection.find(doc! {}).await.map_err(unavailable)?;

        let mut records = Vec::new();
        while cursor.advance().await.map_err(unavailable)? {
            records.push(cursor.deserialize_current().map_err(unavailable)?);
        }
        Ok(records)
    }
}

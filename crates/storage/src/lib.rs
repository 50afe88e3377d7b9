use anyhow::{Context, Result};
use async_trait::async_trait;
use shared::{
    domain::{Collection, BEERS_KEY},
    starter::starter_collection,
};
use tracing::info;

mod sqlite;

pub use sqlite::SqliteKvStore;

/// Single-key string store. `set` must replace the value atomically.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    async fn health_check(&self) -> Result<()>;
}

/// Reads and overwrites the serialized beer collection held under [`BEERS_KEY`].
///
/// Every write replaces the whole collection. There is no merge, no version
/// check and no retry; the last writer wins.
#[derive(Clone)]
pub struct BeerStore<S> {
    kv: S,
}

pub type Storage = BeerStore<SqliteKvStore>;

impl Storage {
    pub async fn open(database_url: &str) -> Result<Self> {
        Ok(Self::new(SqliteKvStore::new(database_url).await?))
    }
}

impl<S: KvStore> BeerStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    pub fn kv(&self) -> &S {
        &self.kv
    }

    pub async fn health_check(&self) -> Result<()> {
        self.kv.health_check().await
    }

    /// Returns `None` when the collection has never been written.
    pub async fn get(&self) -> Result<Option<Collection>> {
        let Some(raw) = self
            .kv
            .get(BEERS_KEY)
            .await
            .with_context(|| format!("failed to read key '{BEERS_KEY}'"))?
        else {
            return Ok(None);
        };
        let collection = serde_json::from_str(&raw)
            .with_context(|| format!("stored value under '{BEERS_KEY}' is not a beer collection"))?;
        Ok(Some(collection))
    }

    /// Like [`BeerStore::get`], but an unseeded store reads as an empty collection.
    pub async fn load(&self) -> Result<Collection> {
        Ok(self.get().await?.unwrap_or_default())
    }

    pub async fn replace(&self, collection: &Collection) -> Result<()> {
        let raw = serde_json::to_string(collection).context("failed to serialize beer collection")?;
        self.kv
            .set(BEERS_KEY, &raw)
            .await
            .with_context(|| format!("failed to write key '{BEERS_KEY}'"))?;
        info!(records = collection.len(), "beer collection replaced");
        Ok(())
    }

    pub async fn seed(&self) -> Result<()> {
        self.seed_with(&starter_collection()).await
    }

    pub async fn seed_with(&self, collection: &Collection) -> Result<()> {
        self.replace(collection).await
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

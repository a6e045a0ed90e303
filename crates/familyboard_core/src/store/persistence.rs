//! Async persistence store with one writer per key.
//!
//! Blocking backend calls run on `tokio::task::spawn_blocking`, so awaiting a
//! store operation suspends only the caller. Each collection key owns an async
//! mutex held for the whole load-mutate-save sequence, which removes the
//! lost-update race between overlapping screen actions.

use super::kv::{KvBackend, MemoryKvBackend};
use super::{decode, encode, Collection, CollectionKey, StoreError, StoreResult};
use log::{debug, info};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, MutexGuard};

/// Process-wide handle to the board collections. Cheap to clone.
#[derive(Clone)]
pub struct PersistenceStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    backend: Arc<dyn KvBackend>,
    tasks_lock: Mutex<()>,
    people_lock: Mutex<()>,
    categories_lock: Mutex<()>,
}

impl PersistenceStore {
    pub fn new(backend: Arc<dyn KvBackend>) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                backend,
                tasks_lock: Mutex::new(()),
                people_lock: Mutex::new(()),
                categories_lock: Mutex::new(()),
            }),
        }
    }

    /// Store over a fresh `MemoryKvBackend`.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryKvBackend::new()))
    }

    /// Reads collection `C`. Returns `None` when the key was never written.
    pub async fn load<C: Collection>(&self) -> StoreResult<Option<Vec<C::Record>>> {
        let _writer = self.lock(C::KEY).await;
        self.read::<C>().await
    }

    /// Reads collection `C`, persisting its seed first if the key is absent.
    ///
    /// Unseeded collections come back empty and nothing is written.
    pub async fn load_or_seed<C: Collection>(&self) -> StoreResult<Vec<C::Record>> {
        let _writer = self.lock(C::KEY).await;
        self.read_or_seed::<C>().await
    }

    /// Overwrites collection `C` with `records`.
    pub async fn save<C: Collection>(&self, records: &[C::Record]) -> StoreResult<()> {
        let _writer = self.lock(C::KEY).await;
        self.write::<C>(records).await
    }

    /// Runs load, `mutate`, save as one serialized step for key `C::KEY`.
    ///
    /// When `mutate` returns an error nothing is written. Load failures are
    /// returned as-is; a failed read is never replaced by a fallback write.
    pub async fn update<C, T, E, F>(&self, mutate: F) -> Result<T, E>
    where
        C: Collection,
        E: From<StoreError>,
        F: FnOnce(&mut Vec<C::Record>) -> Result<T, E>,
    {
        let _writer = self.lock(C::KEY).await;
        let mut records = self.read_or_seed::<C>().await?;
        let output = mutate(&mut records)?;
        self.write::<C>(&records).await?;
        Ok(output)
    }

    /// Removes collection `C` entirely; the next read sees it as never written.
    pub async fn clear<C: Collection>(&self) -> StoreResult<()> {
        let _writer = self.lock(C::KEY).await;
        self.blocking(C::KEY, |backend, key| backend.remove_item(key))
            .await?;
        info!("event=store_clear module=store status=ok key={}", C::KEY);
        Ok(())
    }

    async fn lock(&self, key: CollectionKey) -> MutexGuard<'_, ()> {
        let lock = match key {
            CollectionKey::Tasks => &self.inner.tasks_lock,
            CollectionKey::People => &self.inner.people_lock,
            CollectionKey::Categories => &self.inner.categories_lock,
        };
        lock.lock().await
    }

    async fn read<C: Collection>(&self) -> StoreResult<Option<Vec<C::Record>>> {
        let started_at = Instant::now();
        let raw = self
            .blocking(C::KEY, |backend, key| backend.get_item(key))
            .await?;
        let records = raw.as_deref().map(decode::<C>).transpose()?;
        debug!(
            "event=store_load module=store status=ok key={} present={} records={} duration_ms={}",
            C::KEY,
            records.is_some(),
            records.as_ref().map_or(0, Vec::len),
            started_at.elapsed().as_millis()
        );
        Ok(records)
    }

    async fn read_or_seed<C: Collection>(&self) -> StoreResult<Vec<C::Record>> {
        if let Some(records) = self.read::<C>().await? {
            return Ok(records);
        }
        match C::seed() {
            Some(seed) => {
                self.write::<C>(&seed).await?;
                info!(
                    "event=store_seed module=store status=ok key={} records={}",
                    C::KEY,
                    seed.len()
                );
                Ok(seed)
            }
            None => Ok(Vec::new()),
        }
    }

    async fn write<C: Collection>(&self, records: &[C::Record]) -> StoreResult<()> {
        let started_at = Instant::now();
        let text = encode::<C>(records)?;
        self.blocking(C::KEY, move |backend, key| backend.set_item(key, &text))
            .await?;
        debug!(
            "event=store_save module=store status=ok key={} records={} duration_ms={}",
            C::KEY,
            records.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    async fn blocking<T, F>(&self, key: CollectionKey, op: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn KvBackend, &str) -> StoreResult<T> + Send + 'static,
    {
        let backend = Arc::clone(&self.inner.backend);
        tokio::task::spawn_blocking(move || op(backend.as_ref(), key.as_str()))
            .await
            .map_err(|err| {
                StoreError::unavailable(key.as_str(), format!("storage task failed: {err}"))
            })?
    }
}

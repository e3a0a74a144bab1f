// Folio - A flat-file CMS built with Rust
// Copyright (C) 2025 Folio Project Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::store::CollectionStore;

/// In-memory mirror of a persisted collection.
///
/// Every mutation runs against a copy of the mirror, persists the copy in
/// full, and only then swaps it in. The mirror therefore always equals the
/// last successful write. The write lock serialises writers inside this
/// process only; two processes sharing a file can still lose updates.
pub struct Collection<T> {
    items: RwLock<Vec<T>>,
    store: Arc<dyn CollectionStore<T>>,
}

impl<T> Collection<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Load the collection from its store
    pub async fn open(store: Arc<dyn CollectionStore<T>>) -> Result<Self> {
        let items = store.load().await?;
        Ok(Self {
            items: RwLock::new(items),
            store,
        })
    }

    /// Snapshot of all records in stored order
    pub async fn list(&self) -> Vec<T> {
        self.items.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    /// First record matching `predicate`, by linear scan
    pub async fn find<F>(&self, predicate: F) -> Option<T>
    where
        F: Fn(&T) -> bool,
    {
        self.items.read().await.iter().find(|item| predicate(item)).cloned()
    }

    pub async fn filter<F>(&self, predicate: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        self.items
            .read()
            .await
            .iter()
            .filter(|item| predicate(item))
            .cloned()
            .collect()
    }

    /// Apply `f` to a copy of the collection and persist the result.
    ///
    /// If `f` or the write fails, the mirror is left untouched.
    pub async fn mutate<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Vec<T>) -> Result<R>,
    {
        let mut guard = self.items.write().await;
        let mut next = guard.clone();
        let result = f(&mut next)?;
        self.store.persist(&next).await?;
        *guard = next;
        Ok(result)
    }

    pub async fn insert(&self, item: T) -> Result<()> {
        self.mutate(|items| {
            items.push(item);
            Ok(())
        })
        .await
    }

    /// Replace the first record matching `predicate`. Returns false when
    /// nothing matched, in which case nothing is written.
    pub async fn replace<F>(&self, predicate: F, item: T) -> Result<bool>
    where
        F: Fn(&T) -> bool,
    {
        if self.find(&predicate).await.is_none() {
            return Ok(false);
        }
        self.mutate(|items| match items.iter().position(|i| predicate(i)) {
            Some(index) => {
                items[index] = item;
                Ok(true)
            }
            None => Ok(false),
        })
        .await
    }

    /// Remove every record matching `predicate`
    pub async fn remove<F>(&self, predicate: F) -> Result<bool>
    where
        F: Fn(&T) -> bool,
    {
        if self.find(&predicate).await.is_none() {
            return Ok(false);
        }
        self.mutate(|items| {
            let before = items.len();
            items.retain(|i| !predicate(i));
            Ok(items.len() != before)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{JsonFileStore, MemoryStore};
    use async_trait::async_trait;
    use tempfile::TempDir;

    struct FailingStore;

    #[async_trait]
    impl CollectionStore<String> for FailingStore {
        async fn load(&self) -> Result<Vec<String>> {
            Ok(vec!["seed".to_string()])
        }

        async fn persist(&self, _items: &[String]) -> Result<()> {
            anyhow::bail!("disk full")
        }
    }

    #[tokio::test]
    async fn test_mutate_persists_and_updates_mirror() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("names.json");
        let collection =
            Collection::<String>::open(Arc::new(JsonFileStore::<String>::new(path.clone()))).await?;

        collection
            .mutate(|items| {
                items.push("alpha".to_string());
                Ok(())
            })
            .await?;

        assert_eq!(collection.list().await, vec!["alpha".to_string()]);

        let reopened =
            Collection::<String>::open(Arc::new(JsonFileStore::<String>::new(path))).await?;
        assert_eq!(reopened.list().await, vec!["alpha".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_persist_leaves_mirror_unchanged() -> Result<()> {
        let collection = Collection::<String>::open(Arc::new(FailingStore)).await?;

        let result = collection
            .mutate(|items| {
                items.clear();
                Ok(())
            })
            .await;

        assert!(result.is_err());
        assert_eq!(collection.list().await, vec!["seed".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_closure_leaves_mirror_unchanged() -> Result<()> {
        let collection =
            Collection::<i32>::open(Arc::new(MemoryStore::new(vec![1, 2, 3]))).await?;

        let result: Result<()> = collection
            .mutate(|items| {
                items.push(4);
                anyhow::bail!("rejected")
            })
            .await;

        assert!(result.is_err());
        assert_eq!(collection.len().await, 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_find_and_filter() -> Result<()> {
        let collection =
            Collection::<i32>::open(Arc::new(MemoryStore::new(vec![1, 2, 3, 4]))).await?;

        assert_eq!(collection.find(|n| *n > 2).await, Some(3));
        assert_eq!(collection.find(|n| *n > 10).await, None);
        assert_eq!(collection.filter(|n| n % 2 == 0).await, vec![2, 4]);
        Ok(())
    }
}

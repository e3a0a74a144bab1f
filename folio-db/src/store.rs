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

//! Persistence backends for whole collections.
//!
//! A collection is always loaded and written in one piece. `JsonFileStore`
//! keeps one pretty-printed JSON document per collection on disk; anything
//! else (a real database, a remote service) can sit behind the same trait.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::{
    marker::PhantomData,
    path::{Path, PathBuf},
    sync::Mutex,
};

#[async_trait]
pub trait CollectionStore<T>: Send + Sync {
    /// Load every record. A store that has never been written loads empty.
    async fn load(&self) -> Result<Vec<T>>;

    /// Replace the stored collection with `items`
    async fn persist(&self, items: &[T]) -> Result<()>;
}

/// Flat JSON file holding the whole collection as an array
#[derive(Debug, Clone)]
pub struct JsonFileStore<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl<T> CollectionStore<T> for JsonFileStore<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn load(&self) -> Result<Vec<T>> {
        Ok(read_json_file(&self.path).await?.unwrap_or_default())
    }

    async fn persist(&self, items: &[T]) -> Result<()> {
        write_json_file(&self.path, &items).await
    }
}

/// Read and parse a JSON file. A missing file is `Ok(None)`.
pub async fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", path.display()));
        }
    };

    if content.trim().is_empty() {
        return Ok(None);
    }

    let value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(Some(value))
}

/// Serialize `value` and write it over `path`.
///
/// The document goes to a sibling temp file first and is renamed into place,
/// so readers never observe a half-written file.
pub async fn write_json_file<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    let json = serde_json::to_string_pretty(value).context("Failed to serialize collection")?;

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    tokio::fs::write(&tmp_path, json)
        .await
        .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
    tokio::fs::rename(&tmp_path, path)
        .await
        .with_context(|| format!("Failed to replace {}", path.display()))?;

    tracing::debug!("Persisted {}", path.display());
    Ok(())
}

/// In-process store, handy for tests and for running without a data directory
#[derive(Debug)]
pub struct MemoryStore<T> {
    items: Mutex<Vec<T>>,
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> MemoryStore<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: Mutex::new(items),
        }
    }
}

#[async_trait]
impl<T> CollectionStore<T> for MemoryStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn load(&self) -> Result<Vec<T>> {
        let items = self
            .items
            .lock()
            .map_err(|_| anyhow::anyhow!("Memory store lock poisoned"))?;
        Ok(items.clone())
    }

    async fn persist(&self, items: &[T]) -> Result<()> {
        let mut stored = self
            .items
            .lock()
            .map_err(|_| anyhow::anyhow!("Memory store lock poisoned"))?;
        *stored = items.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: u32,
        name: String,
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                id: 1,
                name: "one".to_string(),
            },
            Row {
                id: 2,
                name: "two".to_string(),
            },
        ]
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty() -> Result<()> {
        let dir = TempDir::new()?;
        let store: JsonFileStore<Row> = JsonFileStore::new(dir.path().join("rows.json"));

        assert!(store.load().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_persist_then_load() -> Result<()> {
        let dir = TempDir::new()?;
        let store = JsonFileStore::new(dir.path().join("nested").join("rows.json"));

        store.persist(&rows()).await?;
        let loaded: Vec<Row> = store.load().await?;

        assert_eq!(loaded, rows());
        assert!(!dir.path().join("nested").join("rows.json.tmp").exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_persist_replaces_whole_file() -> Result<()> {
        let dir = TempDir::new()?;
        let store = JsonFileStore::new(dir.path().join("rows.json"));

        store.persist(&rows()).await?;
        store.persist(&rows()[..1]).await?;
        let loaded: Vec<Row> = store.load().await?;

        assert_eq!(loaded.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("rows.json");
        tokio::fs::write(&path, "{ not json").await?;
        let store: JsonFileStore<Row> = JsonFileStore::new(path);

        let err = store.load().await.unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
        Ok(())
    }

    #[tokio::test]
    async fn test_memory_store() -> Result<()> {
        let store = MemoryStore::new(rows());
        store.persist(&rows()[1..]).await?;

        assert_eq!(store.load().await?, rows()[1..].to_vec());
        Ok(())
    }
}

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

use anyhow::{Context, Result};
use folio_core::models::analytics::{AnalyticsSummary, PageView};
use std::sync::Arc;

use crate::{collection::Collection, store::CollectionStore};

/// Oldest views are dropped once the log grows past this
pub const MAX_PAGE_VIEWS: usize = 10_000;

pub struct AnalyticsRepository {
    views: Collection<PageView>,
    capacity: usize,
}

impl AnalyticsRepository {
    pub async fn open(store: Arc<dyn CollectionStore<PageView>>) -> Result<Self> {
        Self::with_capacity(store, MAX_PAGE_VIEWS).await
    }

    pub async fn with_capacity(
        store: Arc<dyn CollectionStore<PageView>>,
        capacity: usize,
    ) -> Result<Self> {
        let views = Collection::open(store)
            .await
            .context("Failed to load analytics log")?;
        Ok(Self { views, capacity })
    }

    pub async fn record(&self, view: PageView) -> Result<()> {
        let capacity = self.capacity;
        self.views
            .mutate(|views| {
                views.push(view);
                if views.len() > capacity {
                    let excess = views.len() - capacity;
                    views.drain(..excess);
                }
                Ok(())
            })
            .await
            .context("Failed to record page view")
    }

    pub async fn summary(&self) -> AnalyticsSummary {
        AnalyticsSummary::from_views(&self.views.list().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::Utc;

    fn view(path: &str) -> PageView {
        PageView {
            path: path.to_string(),
            referrer: None,
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_record_and_summarize() -> Result<()> {
        let repo = AnalyticsRepository::open(Arc::new(MemoryStore::<PageView>::default())).await?;
        repo.record(view("/blog/a")).await?;
        repo.record(view("/blog/a")).await?;
        repo.record(view("/about")).await?;

        let summary = repo.summary().await;
        assert_eq!(summary.total_views, 3);
        assert_eq!(summary.top_paths[0].path, "/blog/a");
        assert_eq!(summary.top_paths[0].views, 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_log_is_capped() -> Result<()> {
        let repo =
            AnalyticsRepository::with_capacity(Arc::new(MemoryStore::<PageView>::default()), 2)
                .await?;
        repo.record(view("/first")).await?;
        repo.record(view("/second")).await?;
        repo.record(view("/third")).await?;

        let summary = repo.summary().await;
        assert_eq!(summary.total_views, 2);
        assert!(summary.top_paths.iter().all(|p| p.path != "/first"));
        Ok(())
    }
}

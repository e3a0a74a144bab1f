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
use folio_core::{
    models::page::{Page, PageInput},
    utils::slug::unique_slug,
};
use std::sync::Arc;

use crate::{collection::Collection, error::StoreError, store::CollectionStore};

pub struct PageRepository {
    pages: Collection<Page>,
}

impl PageRepository {
    pub async fn open(store: Arc<dyn CollectionStore<Page>>) -> Result<Self> {
        let pages = Collection::open(store)
            .await
            .context("Failed to load pages")?;
        Ok(Self { pages })
    }

    /// All pages ordered by title
    pub async fn list(&self) -> Vec<Page> {
        let mut pages = self.pages.list().await;
        pages.sort_by(|a, b| a.title.cmp(&b.title));
        pages
    }

    pub async fn list_published(&self) -> Vec<Page> {
        let mut pages = self.pages.filter(|p| p.is_published()).await;
        pages.sort_by(|a, b| a.title.cmp(&b.title));
        pages
    }

    pub async fn count(&self) -> usize {
        self.pages.len().await
    }

    pub async fn find_by_id(&self, id: &str) -> Option<Page> {
        self.pages.find(|p| p.id == id).await
    }

    pub async fn find_by_slug(&self, slug: &str) -> Option<Page> {
        self.pages.find(|p| p.slug == slug).await
    }

    pub async fn create(&self, input: PageInput) -> Result<Page> {
        let page = Page::new(input).map_err(|e| StoreError::Validation(e.to_string()))?;

        let page = self
            .pages
            .mutate(|pages| {
                let mut page = page;
                page.slug = unique_slug(&page.slug, pages.iter().map(|p| p.slug.as_str()));
                pages.push(page.clone());
                Ok(page)
            })
            .await
            .context("Failed to create page")?;

        tracing::info!(page_id = %page.id, slug = %page.slug, "Created page");
        Ok(page)
    }

    pub async fn update(&self, id: &str, input: PageInput) -> Result<Option<Page>> {
        self.pages
            .mutate(|pages| {
                let Some(index) = pages.iter().position(|p| p.id == id) else {
                    return Ok(None);
                };

                let mut page = pages[index].clone();
                page.apply(input)
                    .map_err(|e| StoreError::Validation(e.to_string()))?;

                if pages.iter().any(|p| p.id != id && p.slug == page.slug) {
                    return Err(
                        StoreError::Conflict(format!("Slug '{}' is already used", page.slug))
                            .into(),
                    );
                }

                pages[index] = page.clone();
                Ok(Some(page))
            })
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        self.pages
            .remove(|p| p.id == id)
            .await
            .context("Failed to delete page")
    }
}

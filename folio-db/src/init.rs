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
use folio_core::models::{analytics::PageView, menu::Menu, page::Page, post::Post, user::User};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    repositories::{
        AnalyticsRepository, MenuRepository, PageRepository, PostRepository, SettingsRepository,
        UserRepository,
    },
    store::JsonFileStore,
};

/// Locations of the collection files under a data directory
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn users(&self) -> PathBuf {
        self.root.join("users.json")
    }

    pub fn posts(&self) -> PathBuf {
        self.root.join("posts.json")
    }

    pub fn pages(&self) -> PathBuf {
        self.root.join("pages.json")
    }

    pub fn menus(&self) -> PathBuf {
        self.root.join("menus.json")
    }

    pub fn settings(&self) -> PathBuf {
        self.root.join("settings.json")
    }

    pub fn analytics(&self) -> PathBuf {
        self.root.join("analytics.json")
    }
}

/// Every repository, opened against one data directory
#[derive(Clone)]
pub struct Database {
    pub users: Arc<UserRepository>,
    pub posts: Arc<PostRepository>,
    pub pages: Arc<PageRepository>,
    pub menus: Arc<MenuRepository>,
    pub settings: Arc<SettingsRepository>,
    pub analytics: Arc<AnalyticsRepository>,
}

/// Create the data directory if needed and load every collection
pub async fn init_data_dir(path: impl AsRef<Path>) -> Result<Database> {
    let dir = DataDir::new(path.as_ref());
    tokio::fs::create_dir_all(dir.root())
        .await
        .with_context(|| format!("Failed to create data directory {}", dir.root().display()))?;

    tracing::info!(data_dir = %dir.root().display(), "Loading collections");

    let users = UserRepository::open(Arc::new(JsonFileStore::<User>::new(dir.users()))).await?;
    let posts = PostRepository::open(Arc::new(JsonFileStore::<Post>::new(dir.posts()))).await?;
    let pages = PageRepository::open(Arc::new(JsonFileStore::<Page>::new(dir.pages()))).await?;
    let menus = MenuRepository::open(Arc::new(JsonFileStore::<Menu>::new(dir.menus()))).await?;
    let settings = SettingsRepository::open(dir.settings()).await?;
    let analytics =
        AnalyticsRepository::open(Arc::new(JsonFileStore::<PageView>::new(dir.analytics())))
            .await?;

    Ok(Database {
        users: Arc::new(users),
        posts: Arc::new(posts),
        pages: Arc::new(pages),
        menus: Arc::new(menus),
        settings: Arc::new(settings),
        analytics: Arc::new(analytics),
    })
}

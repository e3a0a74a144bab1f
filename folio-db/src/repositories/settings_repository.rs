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
use folio_core::models::settings::SiteSettings;
use std::path::PathBuf;
use tokio::sync::RwLock;

use crate::{
    error::StoreError,
    store::{read_json_file, write_json_file},
};

/// Site-wide settings stored as a single JSON object.
///
/// A missing file yields the defaults; nothing is written until the first
/// `save`.
pub struct SettingsRepository {
    path: Option<PathBuf>,
    current: RwLock<SiteSettings>,
}

impl SettingsRepository {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let current = read_json_file::<SiteSettings>(&path)
            .await
            .with_context(|| format!("Failed to load settings from {}", path.display()))?
            .unwrap_or_default();

        Ok(Self {
            path: Some(path),
            current: RwLock::new(current),
        })
    }

    /// Settings kept only in memory, for tests and throwaway instances
    pub fn in_memory(settings: SiteSettings) -> Self {
        Self {
            path: None,
            current: RwLock::new(settings),
        }
    }

    pub async fn get(&self) -> SiteSettings {
        self.current.read().await.clone()
    }

    pub async fn save(&self, settings: SiteSettings) -> Result<SiteSettings> {
        settings.validate().map_err(StoreError::Validation)?;

        let mut guard = self.current.write().await;
        if let Some(path) = &self.path {
            write_json_file(path, &settings)
                .await
                .context("Failed to save settings")?;
        }
        *guard = settings.clone();

        tracing::info!(site_title = %settings.site_title, "Saved site settings");
        Ok(settings)
    }
}

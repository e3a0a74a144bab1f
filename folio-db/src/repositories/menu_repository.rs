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
use folio_core::models::menu::{Menu, MenuInput};
use std::sync::Arc;

use crate::{collection::Collection, error::StoreError, store::CollectionStore};

pub struct MenuRepository {
    menus: Collection<Menu>,
}

impl MenuRepository {
    pub async fn open(store: Arc<dyn CollectionStore<Menu>>) -> Result<Self> {
        let menus = Collection::open(store)
            .await
            .context("Failed to load menus")?;
        Ok(Self { menus })
    }

    pub async fn list(&self) -> Vec<Menu> {
        self.menus.list().await
    }

    pub async fn find_by_id(&self, id: &str) -> Option<Menu> {
        self.menus.find(|m| m.id == id).await
    }

    /// Menus are looked up by name from templates, e.g. "header"
    pub async fn find_by_name(&self, name: &str) -> Option<Menu> {
        self.menus.find(|m| m.name == name).await
    }

    pub async fn create(&self, input: MenuInput) -> Result<Menu> {
        let menu = Menu::new(input).map_err(|e| StoreError::Validation(e.to_string()))?;

        self.menus
            .mutate(|menus| {
                if menus.iter().any(|m| m.name == menu.name) {
                    return Err(StoreError::Conflict(format!(
                        "A menu named '{}' already exists",
                        menu.name
                    ))
                    .into());
                }
                menus.push(menu.clone());
                Ok(())
            })
            .await?;

        Ok(menu)
    }

    pub async fn update(&self, id: &str, input: MenuInput) -> Result<Option<Menu>> {
        self.menus
            .mutate(|menus| {
                let Some(index) = menus.iter().position(|m| m.id == id) else {
                    return Ok(None);
                };

                let mut menu = menus[index].clone();
                menu.apply(input)
                    .map_err(|e| StoreError::Validation(e.to_string()))?;

                if menus.iter().any(|m| m.id != id && m.name == menu.name) {
                    return Err(StoreError::Conflict(format!(
                        "A menu named '{}' already exists",
                        menu.name
                    ))
                    .into());
                }

                menus[index] = menu.clone();
                Ok(Some(menu))
            })
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        self.menus
            .remove(|m| m.id == id)
            .await
            .context("Failed to delete menu")
    }
}

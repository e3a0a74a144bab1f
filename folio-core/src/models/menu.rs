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
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub label: String,
    pub url: String,
    #[serde(default)]
    pub position: i32,
}

/// Named navigation menu, e.g. "header" or "footer"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Menu {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuInput {
    pub name: String,
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

impl Menu {
    pub fn new(input: MenuInput) -> Result<Self> {
        let mut menu = Self {
            id: Uuid::new_v4().to_string(),
            name: String::new(),
            items: Vec::new(),
        };
        menu.apply(input)?;
        Ok(menu)
    }

    /// Replace name and items. Items end up ordered by position, ties keep
    /// their submitted order.
    pub fn apply(&mut self, input: MenuInput) -> Result<()> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            anyhow::bail!("Menu name cannot be empty");
        }

        for item in &input.items {
            if item.label.trim().is_empty() {
                anyhow::bail!("Menu item label cannot be empty");
            }
            if !is_acceptable_url(&item.url) {
                anyhow::bail!("Menu item '{}' has an invalid URL", item.label);
            }
        }

        let mut items = input.items;
        items.sort_by_key(|item| item.position);

        self.name = name;
        self.items = items;
        Ok(())
    }
}

fn is_acceptable_url(url: &str) -> bool {
    let url = url.trim();
    url.starts_with('/') || url.starts_with("https://") || url.starts_with("http://")
}

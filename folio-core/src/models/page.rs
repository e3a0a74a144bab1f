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
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::post::PublishStatus;
use crate::utils::slug::{slugify, validate_slug};

/// Slugs that would shadow built-in routes
const RESERVED_SLUGS: &[&str] = &["admin", "api", "blog", "login", "logout", "signup", "uploads"];

/// Standalone page such as "About" or "Contact"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub content: String,
    #[serde(default)]
    pub status: PublishStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageInput {
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub status: PublishStatus,
}

impl Page {
    pub fn new(input: PageInput) -> Result<Self> {
        let now = Utc::now();
        let mut page = Self {
            id: Uuid::new_v4().to_string(),
            title: String::new(),
            slug: String::new(),
            content: String::new(),
            status: PublishStatus::Draft,
            created_at: now,
            updated_at: now,
        };
        page.apply(input)?;
        Ok(page)
    }

    pub fn apply(&mut self, input: PageInput) -> Result<()> {
        let title = input.title.trim().to_string();
        if title.is_empty() {
            anyhow::bail!("Title cannot be empty");
        }

        let slug = match input.slug.filter(|s| !s.trim().is_empty()) {
            Some(slug) => slug.trim().to_string(),
            None => slugify(&title),
        };
        validate_slug(&slug).map_err(|e| anyhow::anyhow!("Invalid slug: {}", e))?;
        if RESERVED_SLUGS.contains(&slug.as_str()) {
            anyhow::bail!("Slug '{}' is reserved", slug);
        }

        self.title = title;
        self.slug = slug;
        self.content = input.content;
        self.status = input.status;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn is_published(&self) -> bool {
        self.status == PublishStatus::Published
    }
}

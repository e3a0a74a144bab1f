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

use crate::utils::slug::{slugify, validate_slug};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishStatus {
    #[default]
    Draft,
    Published,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub excerpt: String,
    /// Markdown source
    pub content: String,
    pub cover_image: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub status: PublishStatus,
    pub author_id: String,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editor form payload for creating or replacing a post
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostInput {
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub status: PublishStatus,
}

impl Post {
    pub fn new(input: PostInput, author_id: impl Into<String>) -> Result<Self> {
        let now = Utc::now();
        let mut post = Self {
            id: Uuid::new_v4().to_string(),
            title: String::new(),
            slug: String::new(),
            excerpt: String::new(),
            content: String::new(),
            cover_image: None,
            tags: Vec::new(),
            status: PublishStatus::Draft,
            author_id: author_id.into(),
            published_at: None,
            created_at: now,
            updated_at: now,
        };
        post.apply(input)?;
        Ok(post)
    }

    /// Replace the editable fields. `published_at` is stamped the first time
    /// the post goes live and kept afterwards.
    pub fn apply(&mut self, input: PostInput) -> Result<()> {
        let title = input.title.trim().to_string();
        if title.is_empty() {
            anyhow::bail!("Title cannot be empty");
        }

        let slug = match input.slug.filter(|s| !s.trim().is_empty()) {
            Some(slug) => slug.trim().to_string(),
            None => slugify(&title),
        };
        validate_slug(&slug).map_err(|e| anyhow::anyhow!("Invalid slug: {}", e))?;

        self.title = title;
        self.slug = slug;
        self.excerpt = input.excerpt;
        self.content = input.content;
        self.cover_image = input.cover_image.filter(|s| !s.trim().is_empty());
        self.tags = normalize_tags(input.tags);
        self.status = input.status;
        if self.status == PublishStatus::Published && self.published_at.is_none() {
            self.published_at = Some(Utc::now());
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn is_published(&self) -> bool {
        self.status == PublishStatus::Published
    }
}

fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

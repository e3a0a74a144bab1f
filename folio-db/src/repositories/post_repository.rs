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
    models::post::{Post, PostInput},
    utils::slug::unique_slug,
};
use std::sync::Arc;

use crate::{collection::Collection, error::StoreError, store::CollectionStore};

pub struct PostRepository {
    posts: Collection<Post>,
}

impl PostRepository {
    pub async fn open(store: Arc<dyn CollectionStore<Post>>) -> Result<Self> {
        let posts = Collection::open(store)
            .await
            .context("Failed to load posts")?;
        Ok(Self { posts })
    }

    /// All posts, newest first
    pub async fn list(&self) -> Vec<Post> {
        let mut posts = self.posts.list().await;
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts
    }

    /// Published posts, most recently published first
    pub async fn list_published(&self) -> Vec<Post> {
        let mut posts = self.posts.filter(|p| p.is_published()).await;
        posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        posts
    }

    /// One author's posts, newest first
    pub async fn list_by_author(&self, author_id: &str) -> Vec<Post> {
        let mut posts = self.posts.filter(|p| p.author_id == author_id).await;
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts
    }

    pub async fn count(&self) -> usize {
        self.posts.len().await
    }

    pub async fn find_by_id(&self, id: &str) -> Option<Post> {
        self.posts.find(|p| p.id == id).await
    }

    pub async fn find_by_slug(&self, slug: &str) -> Option<Post> {
        self.posts.find(|p| p.slug == slug).await
    }

    /// Build and store a new post. A slug collision gets a numeric suffix.
    pub async fn create(&self, input: PostInput, author_id: &str) -> Result<Post> {
        let post = Post::new(input, author_id).map_err(|e| StoreError::Validation(e.to_string()))?;

        let post = self
            .posts
            .mutate(|posts| {
                let mut post = post;
                post.slug = unique_slug(&post.slug, posts.iter().map(|p| p.slug.as_str()));
                posts.push(post.clone());
                Ok(post)
            })
            .await
            .context("Failed to create post")?;

        tracing::info!(post_id = %post.id, slug = %post.slug, "Created post");
        Ok(post)
    }

    /// Replace the editable fields of a post. Renaming onto another post's
    /// slug is a conflict.
    pub async fn update(&self, id: &str, input: PostInput) -> Result<Option<Post>> {
        self.posts
            .mutate(|posts| {
                let Some(index) = posts.iter().position(|p| p.id == id) else {
                    return Ok(None);
                };

                let mut post = posts[index].clone();
                post.apply(input)
                    .map_err(|e| StoreError::Validation(e.to_string()))?;

                if posts.iter().any(|p| p.id != id && p.slug == post.slug) {
                    return Err(
                        StoreError::Conflict(format!("Slug '{}' is already used", post.slug))
                            .into(),
                    );
                }

                posts[index] = post.clone();
                Ok(Some(post))
            })
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        self.posts
            .remove(|p| p.id == id)
            .await
            .context("Failed to delete post")
    }
}

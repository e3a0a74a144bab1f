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

//! Public site: home page, blog posts and standalone pages.

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    response::Html,
};
use chrono::Utc;
use folio_core::models::{analytics::PageView, post::Post};
use serde_json::json;

use super::shared::{base_context, render};
use crate::{
    auth::MaybeUser,
    error::{AppError, AppResult},
    markdown::plain_text_excerpt,
    AppState,
};

/// Length of generated summaries on the home page
const SUMMARY_CHARS: usize = 200;

fn summary(post: &Post) -> String {
    if post.excerpt.trim().is_empty() {
        plain_text_excerpt(&post.content, SUMMARY_CHARS)
    } else {
        post.excerpt.clone()
    }
}

/// Append a view to the analytics log. A failed write is logged, never
/// surfaced to the visitor.
async fn record_view(state: &AppState, path: String, headers: &HeaderMap) {
    let referrer = headers
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let view = PageView {
        path,
        referrer,
        timestamp: Utc::now(),
    };
    if let Err(e) = state.db.analytics.record(view).await {
        tracing::warn!("Failed to record page view: {:#}", e);
    }
}

pub async fn home(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    headers: HeaderMap,
) -> AppResult<Html<String>> {
    let mut context = base_context(&state, user.as_ref()).await;
    let settings = state.db.settings.get().await;

    let posts: Vec<_> = state
        .db
        .posts
        .list_published()
        .await
        .iter()
        .take(settings.posts_per_page)
        .map(|post| {
            json!({
                "slug": post.slug,
                "title": post.title,
                "published_at": post.published_at,
                "summary": summary(post),
            })
        })
        .collect();
    context.insert("posts", &posts);

    record_view(&state, "/".to_string(), &headers).await;
    render(&state, "index.html", &context)
}

/// A published post. Drafts are indistinguishable from missing posts.
pub async fn blog_post(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> AppResult<Html<String>> {
    let post = state
        .db
        .posts
        .find_by_slug(&slug)
        .await
        .filter(Post::is_published)
        .ok_or_else(|| AppError::not_found("Post not found"))?;

    let mut context = base_context(&state, user.as_ref()).await;
    context.insert("post", &post);

    record_view(&state, format!("/blog/{}", post.slug), &headers).await;
    render(&state, "post.html", &context)
}

pub async fn page_by_slug(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> AppResult<Html<String>> {
    let page = state
        .db
        .pages
        .find_by_slug(&slug)
        .await
        .filter(|page| page.is_published())
        .ok_or_else(|| AppError::not_found("Page not found"))?;

    let mut context = base_context(&state, user.as_ref()).await;
    context.insert("page", &page);

    record_view(&state, format!("/{}", page.slug), &headers).await;
    render(&state, "page.html", &context)
}

pub async fn not_found() -> AppError {
    AppError::not_found("Not found")
}

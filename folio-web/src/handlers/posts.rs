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

//! `/admin/api/posts`: JSON CRUD over blog posts.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use folio_core::models::post::{Post, PostInput};

use crate::{
    auth::CurrentUser,
    error::{AppError, AppResult},
    AppState,
};

pub async fn list_posts(State(state): State<AppState>) -> Json<Vec<Post>> {
    Json(state.db.posts.list().await)
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Post>> {
    state
        .db
        .posts
        .find_by_id(&id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::not_found("Post not found"))
}

/// New posts belong to the signed-in user
pub async fn create_post(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(input): Json<PostInput>,
) -> AppResult<(StatusCode, Json<Post>)> {
    let post = state.db.posts.create(input, &current.user.id).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<PostInput>,
) -> AppResult<Json<Post>> {
    state
        .db
        .posts
        .update(&id, input)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Post not found"))
}

pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    if state.db.posts.delete(&id).await? {
        tracing::info!(post_id = %id, "Deleted post");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Post not found"))
    }
}

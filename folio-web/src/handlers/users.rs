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

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use folio_core::models::user::{NewUser, PublicUser, User, UserUpdate};

use crate::{
    auth::CurrentUser,
    error::{AppError, AppResult},
    AppState,
};

pub async fn list_users(State(state): State<AppState>) -> Json<Vec<PublicUser>> {
    let users = state.db.users.list().await;
    Json(users.iter().map(User::to_public).collect())
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<PublicUser>> {
    state
        .db
        .users
        .find_by_id(&id)
        .await
        .map(|user| Json(user.to_public()))
        .ok_or_else(|| AppError::not_found("User not found"))
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<NewUser>,
) -> AppResult<(StatusCode, Json<PublicUser>)> {
    let user = User::from_new(input).map_err(|e| AppError::bad_request(e.to_string()))?;
    let user = state.db.users.create(user).await?;
    Ok((StatusCode::CREATED, Json(user.to_public())))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<UserUpdate>,
) -> AppResult<Json<PublicUser>> {
    let user = state
        .db
        .users
        .update(&id, update)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(Json(user.to_public()))
}

/// Deleting your own account would strand the session, so it is refused
pub async fn delete_user(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    if current.user.id == id {
        return Err(AppError::bad_request("You cannot delete your own account"));
    }
    if !state.db.users.delete(&id).await? {
        return Err(AppError::not_found("User not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

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
use folio_core::models::menu::{Menu, MenuInput};

use crate::{
    error::{AppError, AppResult},
    AppState,
};

pub async fn list_menus(State(state): State<AppState>) -> Json<Vec<Menu>> {
    Json(state.db.menus.list().await)
}

pub async fn get_menu(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Menu>> {
    state
        .db
        .menus
        .find_by_id(&id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::not_found("Menu not found"))
}

pub async fn create_menu(
    State(state): State<AppState>,
    Json(input): Json<MenuInput>,
) -> AppResult<(StatusCode, Json<Menu>)> {
    let menu = state.db.menus.create(input).await?;
    Ok((StatusCode::CREATED, Json(menu)))
}

pub async fn update_menu(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<MenuInput>,
) -> AppResult<Json<Menu>> {
    state
        .db
        .menus
        .update(&id, input)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Menu not found"))
}

pub async fn delete_menu(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    match state.db.menus.delete(&id).await? {
        true => Ok(StatusCode::NO_CONTENT),
        false => Err(AppError::not_found("Menu not found")),
    }
}

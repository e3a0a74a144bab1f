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
use folio_core::models::page::{Page, PageInput};

use crate::{
    error::{AppError, AppResult},
    AppState,
};

pub async fn list_pages(State(state): State<AppState>) -> Json<Vec<Page>> {
    Json(state.db.pages.list().await)
}

pub async fn get_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Page>> {
    state
        .db
        .pages
        .find_by_id(&id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::not_found("Page not found"))
}

pub async fn create_page(
    State(state): State<AppState>,
    Json(input): Json<PageInput>,
) -> AppResult<(StatusCode, Json<Page>)> {
    let page = state.db.pages.create(input).await?;
    Ok((StatusCode::CREATED, Json(page)))
}

pub async fn update_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<PageInput>,
) -> AppResult<Json<Page>> {
    match state.db.pages.update(&id, input).await? {
        Some(page) => Ok(Json(page)),
        None => Err(AppError::not_found("Page not found")),
    }
}

pub async fn delete_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    if !state.db.pages.delete(&id).await? {
        return Err(AppError::not_found("Page not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

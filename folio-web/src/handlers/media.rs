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
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::{AppError, AppResult},
    uploads::MediaFile,
    AppState,
};

/// Multipart field carrying the image
const FILE_FIELD: &str = "file";

pub async fn list_media(State(state): State<AppState>) -> AppResult<Json<Vec<MediaFile>>> {
    Ok(Json(state.media.list().await?))
}

pub async fn upload_media(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<MediaFile>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request("Invalid multipart body").with_details(e.to_string()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let original_name = field.file_name().unwrap_or("upload").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::bad_request("Failed to read upload").with_details(e.to_string()))?;

        let file = state.media.save(&original_name, &data).await?;
        return Ok((StatusCode::CREATED, Json(file)));
    }

    Err(AppError::bad_request("No file field in upload"))
}

pub async fn delete_media(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<StatusCode> {
    if state.media.delete(&name).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("File not found"))
    }
}

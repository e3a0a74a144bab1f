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

use axum::{extract::State, Json};
use folio_core::models::settings::SiteSettings;

use crate::{error::AppResult, AppState};

pub async fn get_settings(State(state): State<AppState>) -> Json<SiteSettings> {
    Json(state.db.settings.get().await)
}

/// Replace the site settings wholesale. Invalid values are a 400.
pub async fn update_settings(
    State(state): State<AppState>,
    Json(settings): Json<SiteSettings>,
) -> AppResult<Json<SiteSettings>> {
    let saved = state.db.settings.save(settings).await?;
    tracing::info!(site_title = %saved.site_title, "Site settings updated");
    Ok(Json(saved))
}

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

use axum::response::Html;
use folio_core::models::user::PublicUser;
use tera::Context;

use crate::{error::AppResult, AppState};

/// Name of the menu rendered in the site header
pub const HEADER_MENU: &str = "header";

/// Context shared by every HTML page: settings, header menu, signed-in user
pub async fn base_context(state: &AppState, user: Option<&PublicUser>) -> Context {
    let mut context = Context::new();
    context.insert("settings", &state.db.settings.get().await);
    if let Some(menu) = state.db.menus.find_by_name(HEADER_MENU).await {
        context.insert("menu", &menu);
    }
    if let Some(user) = user {
        context.insert("user", user);
    }
    context
}

pub fn render(state: &AppState, template: &str, context: &Context) -> AppResult<Html<String>> {
    Ok(Html(state.templates.render(template, context)?))
}

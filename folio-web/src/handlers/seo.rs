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
    extract::State,
    http::header,
    response::IntoResponse,
};
use folio_core::{
    seo::{ads_txt, robots_txt, sitemap_xml},
    theme::{select_theme_css, DEFAULT_THEME_CSS},
};

use crate::AppState;

pub async fn theme_css(State(state): State<AppState>) -> impl IntoResponse {
    let settings = state.db.settings.get().await;
    let css = select_theme_css(settings.custom_css.as_deref(), DEFAULT_THEME_CSS);
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], css)
}

pub async fn sitemap(State(state): State<AppState>) -> impl IntoResponse {
    let settings = state.db.settings.get().await;
    let posts = state.db.posts.list_published().await;
    let pages = state.db.pages.list_published().await;
    (
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        sitemap_xml(&settings, &posts, &pages),
    )
}

pub async fn robots(State(state): State<AppState>) -> impl IntoResponse {
    let settings = state.db.settings.get().await;
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        robots_txt(&settings),
    )
}

pub async fn ads(State(state): State<AppState>) -> impl IntoResponse {
    let settings = state.db.settings.get().await;
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        ads_txt(&settings),
    )
}

pub async fn health() -> &'static str {
    "OK"
}

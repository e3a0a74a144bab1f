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
    response::{Html, Redirect},
};
use serde_json::json;

use super::shared::{base_context, render};
use crate::{auth::CurrentUser, error::AppResult, gate::DASHBOARD_PATH, AppState};

const RECENT_POSTS: usize = 5;

pub async fn admin_root() -> Redirect {
    Redirect::to(DASHBOARD_PATH)
}

/// Landing page after sign-in: site counts and the user's latest posts
pub async fn dashboard(
    State(state): State<AppState>,
    current: CurrentUser,
) -> AppResult<Html<String>> {
    let public = current.public();
    let mut context = base_context(&state, Some(&public)).await;

    let summary = state.db.analytics.summary().await;
    context.insert(
        "counts",
        &json!({
            "posts": state.db.posts.count().await,
            "pages": state.db.pages.count().await,
            "users": state.db.users.count().await,
            "views": summary.total_views,
        }),
    );

    let recent: Vec<_> = state
        .db
        .posts
        .list_by_author(&current.user.id)
        .await
        .into_iter()
        .take(RECENT_POSTS)
        .collect();
    context.insert("recent_posts", &recent);

    render(&state, "dashboard.html", &context)
}

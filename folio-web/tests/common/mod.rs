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

#![allow(dead_code)]

use axum_test::TestServer;
use folio_db::init_data_dir;
use folio_web::{routes::create_router, templates::init_templates, AppState, Configuration};
use tempfile::TempDir;

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    _tmp: TempDir,
}

pub async fn spawn_app() -> TestApp {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let root = tmp.path();

    let mut config = Configuration::default();
    config.session.secret = Some("integration-secret".to_string());
    config.session.secure_cookies = false;
    config.path.data = root.join("data").to_string_lossy().to_string();
    config.path.templates = root.join("templates").to_string_lossy().to_string();
    config.upload.directory = root.join("uploads").to_string_lossy().to_string();

    let db = init_data_dir(&config.path.data)
        .await
        .expect("Failed to init data dir");
    let templates =
        init_templates(&config.path.templates, false).expect("Failed to init templates");

    let state = AppState::new(db, templates, config);
    let server =
        TestServer::new(create_router(state.clone())).expect("Failed to create test server");

    TestApp {
        server,
        state,
        _tmp: tmp,
    }
}

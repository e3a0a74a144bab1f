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

use anyhow::{Context, Result};
use folio_db::init_data_dir;
use folio_web::{routes, state::AppState, templates::init_templates, Configuration};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio_web=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Configuration::load()?;
    info!("Starting Folio web server");

    info!("Data directory: {}", config.path.data);
    let db = init_data_dir(&config.path.data).await?;

    info!("Loading templates from: {}", config.path.templates);
    let templates = init_templates(&config.path.templates, config.development_mode)?;

    tokio::fs::create_dir_all(&config.upload.directory)
        .await
        .with_context(|| format!("Failed to create uploads directory {}", config.upload.directory))?;
    info!("Uploads directory: {}", config.upload.directory);

    let bind_addr = config.bind_addr();
    let state = AppState::new(db, templates, config);
    let app = routes::create_router(state);

    let listener = TcpListener::bind(&bind_addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

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

pub mod analytics;
pub mod auth;
pub mod dashboard;
pub mod media;
pub mod menus;
pub mod pages;
pub mod posts;
pub mod public;
pub mod seo;
pub mod session_api;
pub mod settings;
pub mod shared;
pub mod users;

pub use auth::{login, login_form, logout, signup, signup_form};
pub use dashboard::{admin_root, dashboard};
pub use public::{blog_post, home, not_found, page_by_slug};
pub use session_api::current_session;

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

pub mod analytics_repository;
pub mod menu_repository;
pub mod page_repository;
pub mod post_repository;
pub mod settings_repository;
pub mod user_repository;

pub use analytics_repository::*;
pub use menu_repository::*;
pub use page_repository::*;
pub use post_repository::*;
pub use settings_repository::*;
pub use user_repository::*;

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

use serde::{Deserialize, Serialize};

/// Site-wide settings edited from the admin settings screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    pub site_title: String,
    pub site_description: String,
    /// Absolute base URL used for sitemap and robots output
    pub site_url: String,
    pub posts_per_page: usize,
    /// Overrides the built-in theme stylesheet when non-blank
    pub custom_css: Option<String>,
    pub ads_txt: Option<String>,
    pub google_analytics_id: Option<String>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            site_title: "Folio".to_string(),
            site_description: String::new(),
            site_url: "http://localhost:3000".to_string(),
            posts_per_page: 10,
            custom_css: None,
            ads_txt: None,
            google_analytics_id: None,
        }
    }
}

impl SiteSettings {
    pub fn validate(&self) -> Result<(), String> {
        if self.site_title.trim().is_empty() {
            return Err("Site title cannot be empty".to_string());
        }

        if !(self.site_url.starts_with("http://") || self.site_url.starts_with("https://")) {
            return Err("Site URL must start with http:// or https://".to_string());
        }

        if self.posts_per_page == 0 || self.posts_per_page > 100 {
            return Err("Posts per page must be between 1 and 100".to_string());
        }

        Ok(())
    }

    /// Site URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.site_url.trim_end_matches('/')
    }
}

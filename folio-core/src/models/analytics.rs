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

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One entry in the analytics log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageView {
    pub path: String,
    pub referrer: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathCount {
    pub path: String,
    pub views: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayCount {
    pub date: NaiveDate,
    pub views: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsSummary {
    pub total_views: usize,
    /// Most viewed first, ties broken by path
    pub top_paths: Vec<PathCount>,
    /// Oldest day first
    pub views_by_day: Vec<DayCount>,
    pub top_referrers: Vec<PathCount>,
}

impl AnalyticsSummary {
    pub fn from_views(views: &[PageView]) -> Self {
        let mut by_path: BTreeMap<&str, usize> = BTreeMap::new();
        let mut by_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        let mut by_referrer: BTreeMap<&str, usize> = BTreeMap::new();

        for view in views {
            *by_path.entry(view.path.as_str()).or_default() += 1;
            *by_day.entry(view.timestamp.date_naive()).or_default() += 1;
            if let Some(referrer) = view.referrer.as_deref().filter(|r| !r.is_empty()) {
                *by_referrer.entry(referrer).or_default() += 1;
            }
        }

        Self {
            total_views: views.len(),
            top_paths: ranked(by_path),
            views_by_day: by_day
                .into_iter()
                .map(|(date, views)| DayCount { date, views })
                .collect(),
            top_referrers: ranked(by_referrer),
        }
    }
}

fn ranked(counts: BTreeMap<&str, usize>) -> Vec<PathCount> {
    let mut ranked: Vec<PathCount> = counts
        .into_iter()
        .map(|(path, views)| PathCount {
            path: path.to_string(),
            views,
        })
        .collect();
    // stable sort keeps the BTreeMap's path order for ties
    ranked.sort_by(|a, b| b.views.cmp(&a.views));
    ranked
}

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

//! Theme stylesheet resolution

pub const DEFAULT_THEME_CSS: &str = r#":root {
    --folio-text: #1f2933;
    --folio-muted: #616e7c;
    --folio-accent: #0b6bcb;
    --folio-border: #e4e7eb;
}
body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
    line-height: 1.6;
    max-width: 760px;
    margin: 0 auto;
    padding: 20px;
    color: var(--folio-text);
}
a { color: var(--folio-accent); }
nav { border-bottom: 1px solid var(--folio-border); padding-bottom: 10px; margin-bottom: 20px; }
nav a { margin-right: 15px; text-decoration: none; }
.post-meta { color: var(--folio-muted); font-size: 0.9em; }
footer { margin-top: 40px; padding-top: 20px; border-top: 1px solid var(--folio-border); color: var(--folio-muted); }
"#;

/// Pick the stylesheet to serve: the site's custom CSS when it has any
/// content, the default theme otherwise.
pub fn select_theme_css(custom: Option<&str>, default: &str) -> String {
    match custom {
        Some(css) if !css.trim().is_empty() => css.to_string(),
        _ => default.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_css_wins() {
        let css = select_theme_css(Some("body { color: red; }"), DEFAULT_THEME_CSS);
        assert_eq!(css, "body { color: red; }");
    }

    #[test]
    fn test_blank_custom_css_falls_back() {
        assert_eq!(select_theme_css(Some("  \n"), "default"), "default");
        assert_eq!(select_theme_css(None, "default"), "default");
    }
}

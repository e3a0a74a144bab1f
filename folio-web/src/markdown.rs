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

use pulldown_cmark::{html, Event, Options, Parser, TagEnd};
use std::collections::HashMap;

fn options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

/// Render post or page markdown to sanitised HTML
pub fn markdown_to_html(markdown: &str) -> String {
    let mut rendered = String::new();
    html::push_html(&mut rendered, Parser::new_ext(markdown, options()));
    ammonia::clean(&rendered)
}

/// Plain-text preview of at most `max_chars` characters, used when a post
/// has no explicit excerpt
pub fn plain_text_excerpt(markdown: &str, max_chars: usize) -> String {
    let mut text = String::new();
    for event in Parser::new_ext(markdown, options()) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak
            | Event::HardBreak
            | Event::End(
                TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item | TagEnd::CodeBlock,
            ) => text.push(' '),
            _ => {}
        }
    }

    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }

    let mut cut: String = collapsed.chars().take(max_chars).collect();
    if let Some(space) = cut.rfind(' ') {
        cut.truncate(space);
    }
    cut.push('…');
    cut
}

/// Tera `markdown` filter
pub fn make_markdown_filter() -> impl tera::Filter {
    |value: &tera::Value, _: &HashMap<String, tera::Value>| match value.as_str() {
        Some(text) => Ok(tera::Value::String(markdown_to_html(text))),
        None => Err(tera::Error::msg("markdown filter expects a string")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_markdown() {
        let html = markdown_to_html("# Release notes\n\nNow with **tags**.");
        assert!(html.contains("<h1>Release notes</h1>"));
        assert!(html.contains("<strong>tags</strong>"));
    }

    #[test]
    fn test_script_is_stripped() {
        let html = markdown_to_html("Hi <script>alert('xss')</script> there");
        assert!(!html.contains("<script>"));
        assert!(!html.contains("alert"));
    }

    #[test]
    fn test_javascript_links_neutralised() {
        let html = markdown_to_html("[click](javascript:alert(1))");
        assert!(!html.contains("javascript:"));
    }

    #[test]
    fn test_excerpt_strips_markup() {
        let excerpt = plain_text_excerpt("## Title\n\nSome *emphasis* and `code`.", 200);
        assert_eq!(excerpt, "Title Some emphasis and code.");
    }

    #[test]
    fn test_excerpt_truncates_on_word_boundary() {
        let excerpt = plain_text_excerpt("one two three four five", 12);
        assert_eq!(excerpt, "one two…");
    }
}

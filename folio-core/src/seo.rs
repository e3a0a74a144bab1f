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

//! Text generators for sitemap.xml, robots.txt and ads.txt

use chrono::{DateTime, Utc};

use crate::models::{Page, Post, SiteSettings};

fn xml_escape(value: &str) -> String {
    html_escape::encode_text(value).into_owned()
}

fn url_entry(out: &mut String, loc: &str, lastmod: Option<DateTime<Utc>>) {
    out.push_str("  <url>\n");
    out.push_str(&format!("    <loc>{}</loc>\n", xml_escape(loc)));
    if let Some(lastmod) = lastmod {
        out.push_str(&format!(
            "    <lastmod>{}</lastmod>\n",
            lastmod.format("%Y-%m-%d")
        ));
    }
    out.push_str("  </url>\n");
}

/// Build a sitemap with the home page plus every published post and page.
/// Drafts never appear.
pub fn sitemap_xml(settings: &SiteSettings, posts: &[Post], pages: &[Page]) -> String {
    let base = settings.base_url();
    let mut out = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );

    let newest = posts
        .iter()
        .filter(|p| p.is_published())
        .map(|p| p.updated_at)
        .max();
    url_entry(&mut out, &format!("{}/", base), newest);

    for post in posts.iter().filter(|p| p.is_published()) {
        url_entry(
            &mut out,
            &format!("{}/blog/{}", base, post.slug),
            Some(post.updated_at),
        );
    }

    for page in pages.iter().filter(|p| p.is_published()) {
        url_entry(
            &mut out,
            &format!("{}/{}", base, page.slug),
            Some(page.updated_at),
        );
    }

    out.push_str("</urlset>\n");
    out
}

pub fn robots_txt(settings: &SiteSettings) -> String {
    format!(
        "User-agent: *\nAllow: /\nDisallow: /admin\nDisallow: /api\n\nSitemap: {}/sitemap.xml\n",
        settings.base_url()
    )
}

pub fn ads_txt(settings: &SiteSettings) -> String {
    match settings.ads_txt.as_deref() {
        Some(content) if !content.trim().is_empty() => {
            let mut body = content.trim_end().to_string();
            body.push('\n');
            body
        }
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PageInput, PostInput, PublishStatus};

    fn settings() -> SiteSettings {
        SiteSettings {
            site_url: "https://blog.example/".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_sitemap_skips_drafts() {
        let published = Post::new(
            PostInput {
                title: "Live & Well".to_string(),
                status: PublishStatus::Published,
                ..Default::default()
            },
            "a",
        )
        .unwrap();
        let draft = Post::new(
            PostInput {
                title: "Secret".to_string(),
                ..Default::default()
            },
            "a",
        )
        .unwrap();
        let page = Page::new(PageInput {
            title: "About".to_string(),
            status: PublishStatus::Published,
            ..Default::default()
        })
        .unwrap();

        let xml = sitemap_xml(&settings(), &[published, draft], &[page]);

        assert!(xml.contains("<loc>https://blog.example/</loc>"));
        assert!(xml.contains("<loc>https://blog.example/blog/live-well</loc>"));
        assert!(xml.contains("<loc>https://blog.example/about</loc>"));
        assert!(!xml.contains("secret"));
        assert!(xml.ends_with("</urlset>\n"));
    }

    #[test]
    fn test_robots_points_at_sitemap() {
        let robots = robots_txt(&settings());

        assert!(robots.contains("Disallow: /admin"));
        assert!(robots.contains("Sitemap: https://blog.example/sitemap.xml"));
    }

    #[test]
    fn test_ads_txt() {
        let mut s = settings();
        assert_eq!(ads_txt(&s), "");

        s.ads_txt = Some("google.com, pub-123, DIRECT, f08c47fec0942fa0\n\n".to_string());
        assert_eq!(
            ads_txt(&s),
            "google.com, pub-123, DIRECT, f08c47fec0942fa0\n"
        );
    }
}

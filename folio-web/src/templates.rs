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

//! Tera templates. Missing templates are written out with built-in defaults
//! so a fresh install renders without any setup; edited copies are never
//! overwritten.

use anyhow::{Context as _, Result};
use std::{
    path::Path,
    sync::{Arc, PoisonError, RwLock},
};
use tera::{Context, Tera};

use crate::markdown::make_markdown_filter;

/// Tera wrapper that re-reads templates on each render in development mode
#[derive(Clone)]
pub enum TemplateEngine {
    Static(Arc<Tera>),
    Reloadable {
        templates_dir: String,
        cached: Arc<RwLock<Tera>>,
    },
}

impl TemplateEngine {
    pub fn new(templates_dir: &str, development_mode: bool) -> Result<Self> {
        let tera = Self::load(templates_dir)?;
        if development_mode {
            tracing::info!("Template hot reload enabled (development mode)");
            Ok(Self::Reloadable {
                templates_dir: templates_dir.to_string(),
                cached: Arc::new(RwLock::new(tera)),
            })
        } else {
            Ok(Self::Static(Arc::new(tera)))
        }
    }

    fn load(templates_dir: &str) -> Result<Tera> {
        let pattern = format!("{}/**/*.html", templates_dir.trim_end_matches('/'));
        let mut tera = Tera::new(&pattern)
            .with_context(|| format!("Failed to load templates from {}", templates_dir))?;
        tera.register_filter("markdown", make_markdown_filter());
        Ok(tera)
    }

    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        match self {
            Self::Static(tera) => tera
                .render(template_name, context)
                .with_context(|| format!("Failed to render {}", template_name)),
            Self::Reloadable {
                templates_dir,
                cached,
            } => {
                match Self::load(templates_dir) {
                    Ok(fresh) => {
                        *cached.write().unwrap_or_else(PoisonError::into_inner) = fresh;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to reload templates, using cached copy: {:#}", e);
                    }
                }
                cached
                    .read()
                    .unwrap_or_else(PoisonError::into_inner)
                    .render(template_name, context)
                    .with_context(|| format!("Failed to render {}", template_name))
            }
        }
    }
}

/// Create the templates directory, fill in missing defaults and load it
pub fn init_templates(templates_dir: &str, development_mode: bool) -> Result<TemplateEngine> {
    std::fs::create_dir_all(templates_dir).context("Failed to create templates directory")?;
    write_default_templates(Path::new(templates_dir))?;
    TemplateEngine::new(templates_dir, development_mode)
}

fn write_default_templates(dir: &Path) -> Result<()> {
    for (name, body) in DEFAULT_TEMPLATES {
        let path = dir.join(name);
        if !path.exists() {
            std::fs::write(&path, body)
                .with_context(|| format!("Failed to write default template {}", name))?;
            tracing::debug!(template = %name, "Wrote default template");
        }
    }
    Ok(())
}

const DEFAULT_TEMPLATES: &[(&str, &str)] = &[
    ("base.html", BASE),
    ("login.html", LOGIN),
    ("signup.html", SIGNUP),
    ("index.html", INDEX),
    ("post.html", POST),
    ("page.html", PAGE),
    ("dashboard.html", DASHBOARD),
];

const BASE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{% block title %}{{ settings.site_title }}{% endblock %}</title>
    <meta name="description" content="{{ settings.site_description }}">
    <link rel="stylesheet" href="/theme.css">
    {% if settings.google_analytics_id %}
    <script async src="https://www.googletagmanager.com/gtag/js?id={{ settings.google_analytics_id }}"></script>
    {% endif %}
    {% block head %}{% endblock %}
</head>
<body>
    <header>
        <a class="site-title" href="/">{{ settings.site_title }}</a>
        <nav>
            {% if menu %}{% for item in menu.items %}
            <a href="{{ item.url }}">{{ item.label }}</a>
            {% endfor %}{% endif %}
            {% if user %}
            <a href="/admin/dashboard">Dashboard</a>
            <form method="post" action="/logout" class="inline"><button type="submit">Log out</button></form>
            {% else %}
            <a href="/login">Log in</a>
            {% endif %}
        </nav>
    </header>

    <main>
        {% block content %}{% endblock %}
    </main>

    <footer>
        <p>{{ settings.site_title }}</p>
    </footer>
</body>
</html>"#;

const LOGIN: &str = r#"{% extends "base.html" %}

{% block title %}Log in - {{ settings.site_title }}{% endblock %}

{% block content %}
<h1>Log in</h1>

{% if error %}
<p class="error">{{ error }}</p>
{% endif %}

<form method="post" action="/login">
    <label for="email">Email</label>
    <input type="email" id="email" name="email" value="{{ email | default(value="") }}" required>

    <label for="password">Password</label>
    <input type="password" id="password" name="password" required>

    <button type="submit">Log in</button>
</form>
<p>No account? <a href="/signup">Sign up</a></p>
{% endblock %}"#;

const SIGNUP: &str = r#"{% extends "base.html" %}

{% block title %}Sign up - {{ settings.site_title }}{% endblock %}

{% block content %}
<h1>Create an account</h1>

{% if error %}
<p class="error">{{ error }}</p>
{% endif %}

<form method="post" action="/signup">
    <label for="name">Name</label>
    <input type="text" id="name" name="name" value="{{ name | default(value="") }}" required>

    <label for="email">Email</label>
    <input type="email" id="email" name="email" value="{{ email | default(value="") }}" required>

    <label for="password">Password</label>
    <input type="password" id="password" name="password" minlength="8" required>

    <button type="submit">Sign up</button>
</form>
<p>Already registered? <a href="/login">Log in</a></p>
{% endblock %}"#;

const INDEX: &str = r#"{% extends "base.html" %}

{% block content %}
<h1>{{ settings.site_title }}</h1>
<p class="tagline">{{ settings.site_description }}</p>

{% if posts %}
{% for post in posts %}
<article>
    <h2><a href="/blog/{{ post.slug }}">{{ post.title }}</a></h2>
    {% if post.published_at %}<time>{{ post.published_at | date(format="%B %e, %Y") }}</time>{% endif %}
    <p>{{ post.summary }}</p>
</article>
{% endfor %}
{% else %}
<p>Nothing published yet.</p>
{% endif %}
{% endblock %}"#;

const POST: &str = r#"{% extends "base.html" %}

{% block title %}{{ post.title }} - {{ settings.site_title }}{% endblock %}

{% block content %}
<article>
    <h1>{{ post.title }}</h1>
    {% if post.published_at %}<time>{{ post.published_at | date(format="%B %e, %Y") }}</time>{% endif %}
    {% if post.cover_image %}<img src="{{ post.cover_image }}" alt="">{% endif %}
    <div class="content">{{ post.content | markdown | safe }}</div>
    {% if post.tags %}
    <ul class="tags">{% for tag in post.tags %}<li>{{ tag }}</li>{% endfor %}</ul>
    {% endif %}
</article>
{% endblock %}"#;

const PAGE: &str = r#"{% extends "base.html" %}

{% block title %}{{ page.title }} - {{ settings.site_title }}{% endblock %}

{% block content %}
<article>
    <h1>{{ page.title }}</h1>
    <div class="content">{{ page.content | markdown | safe }}</div>
</article>
{% endblock %}"#;

const DASHBOARD: &str = r#"{% extends "base.html" %}

{% block title %}Dashboard - {{ settings.site_title }}{% endblock %}

{% block content %}
<h1>Welcome, {{ user.name }}</h1>

<ul class="stats">
    <li>{{ counts.posts }} posts</li>
    <li>{{ counts.pages }} pages</li>
    <li>{{ counts.users }} users</li>
    <li>{{ counts.views }} page views</li>
</ul>

<h2>Your recent posts</h2>
{% if recent_posts %}
<ul>
{% for post in recent_posts %}
    <li>{{ post.title }} <small>({{ post.status }})</small></li>
{% endfor %}
</ul>
{% else %}
<p>No posts yet.</p>
{% endif %}
{% endblock %}"#;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn context() -> Context {
        let mut context = Context::new();
        context.insert(
            "settings",
            &json!({"site_title": "Folio", "site_description": "Notes"}),
        );
        context
    }

    #[test]
    fn test_init_writes_defaults() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().to_string_lossy().to_string();

        init_templates(&path, false)?;
        for (name, _) in DEFAULT_TEMPLATES {
            assert!(dir.path().join(name).exists(), "{} missing", name);
        }
        Ok(())
    }

    #[test]
    fn test_existing_templates_kept() -> Result<()> {
        let dir = TempDir::new()?;
        std::fs::write(dir.path().join("page.html"), "custom {{ page.title }}")?;

        let engine = init_templates(&dir.path().to_string_lossy(), false)?;
        let mut context = context();
        context.insert("page", &json!({"title": "About", "content": ""}));

        assert_eq!(engine.render("page.html", &context)?, "custom About");
        Ok(())
    }

    #[test]
    fn test_post_renders_markdown() -> Result<()> {
        let dir = TempDir::new()?;
        let engine = init_templates(&dir.path().to_string_lossy(), false)?;

        let mut context = context();
        context.insert(
            "post",
            &json!({"title": "Hello", "content": "Some **bold** text", "tags": []}),
        );
        let html = engine.render("post.html", &context)?;

        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("<title>Hello - Folio</title>"));
        Ok(())
    }

    #[test]
    fn test_reloadable_picks_up_edits() -> Result<()> {
        let dir = TempDir::new()?;
        let engine = init_templates(&dir.path().to_string_lossy(), true)?;
        std::fs::write(dir.path().join("page.html"), "edited")?;

        assert_eq!(engine.render("page.html", &context())?, "edited");
        Ok(())
    }
}

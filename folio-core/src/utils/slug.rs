use once_cell::sync::Lazy;
use regex::Regex;

static SLUG_SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("Failed to compile slug regex"));

static VALID_SLUG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("Failed to compile slug validation regex")
});

const MAX_SLUG_LEN: usize = 100;

/// Turn a post or page title into a URL segment.
pub fn slugify(title: &str) -> String {
    let lowered = title.trim().to_lowercase();
    let mut slug = SLUG_SEPARATORS
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string();

    if slug.is_empty() {
        return "untitled".to_string();
    }

    if slug.len() > MAX_SLUG_LEN {
        slug = slug
            .chars()
            .take(MAX_SLUG_LEN)
            .collect::<String>()
            .trim_end_matches('-')
            .to_string();
    }

    slug
}

/// Validate a slug supplied by an editor
pub fn validate_slug(slug: &str) -> Result<(), String> {
    if slug.is_empty() {
        return Err("Slug cannot be empty".to_string());
    }

    if slug.len() > MAX_SLUG_LEN {
        return Err(format!("Slug cannot exceed {} characters", MAX_SLUG_LEN));
    }

    if !VALID_SLUG.is_match(slug) {
        return Err(
            "Slug may only contain lowercase letters, digits and single hyphens".to_string(),
        );
    }

    Ok(())
}

/// Append `-2`, `-3`, ... until the slug no longer collides with `taken`.
pub fn unique_slug<'a, I>(base: &str, taken: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let taken: Vec<&str> = taken.into_iter().collect();
    if !taken.contains(&base) {
        return base.to_string();
    }

    let mut suffix = 2;
    loop {
        let candidate = format!("{}-{}", base, suffix);
        if !taken.contains(&candidate.as_str()) {
            return candidate;
        }
        suffix += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("About Us"), "about-us");
        assert_eq!(slugify("Contact"), "contact");
    }

    #[test]
    fn test_slugify_punctuation() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("What's New?"), "what-s-new");
        assert_eq!(slugify("Price: $99.99"), "price-99-99");
    }

    #[test]
    fn test_slugify_empty_input() {
        assert_eq!(slugify(""), "untitled");
        assert_eq!(slugify("   "), "untitled");
        assert_eq!(slugify("!!!"), "untitled");
    }

    #[test]
    fn test_slugify_truncates() {
        let title = "word ".repeat(60);
        let slug = slugify(&title);
        assert!(slug.len() <= MAX_SLUG_LEN);
        assert!(!slug.ends_with('-'));
    }

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("hello-world").is_ok());
        assert!(validate_slug("2024-review").is_ok());
        assert!(validate_slug("").is_err());
        assert!(validate_slug("Hello").is_err());
        assert!(validate_slug("double--dash").is_err());
        assert!(validate_slug("-leading").is_err());
        assert!(validate_slug("with space").is_err());
        assert!(validate_slug("../etc").is_err());
    }

    #[test]
    fn test_unique_slug() {
        assert_eq!(unique_slug("post", ["other"]), "post");
        assert_eq!(unique_slug("post", ["post"]), "post-2");
        assert_eq!(unique_slug("post", ["post", "post-2", "post-3"]), "post-4");
    }
}

// src/services/slug.rs
// DOCUMENTATION: URL slug generation
// PURPOSE: Derive venue/category slugs from names and keep venue slugs unique

use crate::db::VenueRepository;
use crate::errors::VenueError;
use sqlx::PgPool;
use std::collections::HashSet;
use uuid::Uuid;

/// Used when a name has no ASCII-representable alphanumerics
pub const FALLBACK_SLUG: &str = "venue";

/// Lowercase, transliterated, dash-separated slug of `name`
pub fn slugify(name: &str) -> String {
    let slug = slug::slugify(name);
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// `base` if free, otherwise the first free `base-1`, `base-2`, ...
pub fn next_free_slug(base: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }

    let mut counter = 1u32;
    loop {
        let candidate = format!("{}-{}", base, counter);
        if !taken.contains(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// Unique venue slug for `name`, ignoring the venue being saved
pub async fn unique_venue_slug(
    pool: &PgPool,
    name: &str,
    exclude_id: Option<Uuid>,
) -> Result<String, VenueError> {
    let base = slugify(name);
    let taken = VenueRepository::slugs_with_base(pool, &base, exclude_id).await?;
    Ok(next_free_slug(&base, &taken))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn taken(slugs: &[&str]) -> HashSet<String> {
        slugs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Grand Hotel Lisboa"), "grand-hotel-lisboa");
        assert_eq!(slugify("  Café  Nicola! "), "cafe-nicola");
        assert_eq!(slugify("Zürich Bahnhof"), "zurich-bahnhof");
    }

    #[test]
    fn test_slugify_fallback() {
        assert_eq!(slugify(""), FALLBACK_SLUG);
        assert_eq!(slugify("!!! ???"), FALLBACK_SLUG);
    }

    #[test]
    fn test_next_free_slug_when_base_is_free() {
        assert_eq!(next_free_slug("cafe", &taken(&["cafe-1"])), "cafe");
    }

    #[test]
    fn test_next_free_slug_counts_up() {
        assert_eq!(next_free_slug("cafe", &taken(&["cafe"])), "cafe-1");
        assert_eq!(
            next_free_slug("cafe", &taken(&["cafe", "cafe-1", "cafe-2"])),
            "cafe-3"
        );
        // gaps are filled first
        assert_eq!(next_free_slug("cafe", &taken(&["cafe", "cafe-2"])), "cafe-1");
    }
}

//! URL slugs for business names.

use uuid::Uuid;

/// Length of the random suffix appended on collision.
const SUFFIX_LEN: usize = 6;

/// Slug used when a name has no usable characters.
const FALLBACK_SLUG: &str = "business";

/// Derive a URL-safe slug from a business name.
///
/// Apostrophes are dropped so possessives stay one word, every other run
/// of non-alphanumeric characters becomes a single hyphen, and leading or
/// trailing hyphens are trimmed.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for ch in name.chars().flat_map(char::to_lowercase) {
        if matches!(ch, '\'' | '\u{2019}') {
            continue;
        }
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        } else {
            pending_hyphen = true;
        }
    }

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// `base` with a short random suffix, for use after a collision.
pub fn suffixed(base: &str) -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("{base}-{}", &random[..SUFFIX_LEN])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_examples() {
        assert_eq!(slugify("Joe's Tacos"), "joes-tacos");
        assert_eq!(slugify("Shop X"), "shop-x");
        assert_eq!(slugify("  Café & Bar -- McAllen!  "), "caf-bar-mcallen");
        assert_eq!(slugify("Rosa\u{2019}s Flowers"), "rosas-flowers");
        assert_eq!(slugify("!!!"), "business");
    }

    #[test]
    fn test_suffixed_keeps_base() {
        let slug = suffixed("joes-tacos");
        assert!(slug.starts_with("joes-tacos-"));
        assert_eq!(slug.len(), "joes-tacos-".len() + SUFFIX_LEN);
        assert_ne!(slug, suffixed("joes-tacos"));
    }
}

//! Slug derivation for post URLs.

const MAX_SLUG_LEN: usize = 200;

/// Derive a URL-safe slug from a title.
///
/// ASCII alphanumerics are lowercased and kept; any other run of characters
/// collapses to a single hyphen. The result never starts or ends with a
/// hyphen and is capped at the column width of the slug field.
pub fn slugify(input: &str) -> String {
    let mut slug = String::new();
    let mut last_was_dash = false;

    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_was_dash = false;
        } else if !slug.is_empty() && !last_was_dash {
            slug.push('-');
            last_was_dash = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    if slug.len() > MAX_SLUG_LEN {
        slug.truncate(MAX_SLUG_LEN);
        while slug.ends_with('-') {
            slug.pop();
        }
    }

    slug
}

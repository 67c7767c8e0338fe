//! Small text helpers shared by the catalog and the form layer.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Width of the `attribute.slug` column
pub const SLUG_MAX_LENGTH: usize = 50;

static SLUG_RE: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::unwrap_used)] // Literal pattern
    Regex::new(&format!(r"^[-a-zA-Z0-9_]{{1,{SLUG_MAX_LENGTH}}}$")).unwrap()
});

static IDENT_RE: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::unwrap_used)] // Literal pattern
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$").unwrap()
});

/// Whether `slug` is a valid attribute slug: 1 to 50 letters, digits, `-`, `_`
pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_RE.is_match(slug)
}

/// Whether `name` can be used unquoted as a type or table name
///
/// PostgreSQL truncates identifiers beyond 63 bytes.
pub fn is_valid_identifier(name: &str) -> bool {
    IDENT_RE.is_match(name)
}

/// Slugify text, replacing dashes with underscores
///
/// Accented letters are decomposed and reduced to ASCII, other non-ASCII
/// characters are dropped. Letters and digits are kept (lowercased), runs of
/// whitespace and dashes become a single `_`, and leading or trailing
/// underscores are stripped.
///
/// ```
/// use lifeguard_mav::utils::slugify_with_underscores;
///
/// assert_eq!(slugify_with_underscores("Screen size (inch)"), "screen_size_inch");
/// assert_eq!(slugify_with_underscores("  e-mail  "), "e_mail");
/// assert_eq!(slugify_with_underscores("Crème brûlée"), "creme_brulee");
/// ```
pub fn slugify_with_underscores(text: &str) -> String {
    let ascii: String = text.nfkd().filter(char::is_ascii).collect();
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_sep = false;
    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_sep {
                slug.push('_');
            }
            pending_sep = false;
            slug.push(c.to_ascii_lowercase());
        } else if c.is_ascii_whitespace() || c == '-' {
            pending_sep = true;
        }
    }
    slug.trim_matches('_').to_string()
}

/// Uppercase the first character, leave the rest untouched
pub fn capfirst(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

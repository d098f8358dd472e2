//! Locale tags: splitting a tag into its subtags and computing the order in
//! which bundle locales are tried.

/// Returns true for the characters that separate the primary language subtag
/// from the region (`en-US`, `en_US`).
fn is_separator(c: char) -> bool {
    c == '-' || c == '_'
}

/// Primary language subtag of a locale tag.
///
/// # Example
/// ```
/// use bear_facts_skill::i18n::primary_subtag;
///
/// assert_eq!(primary_subtag("en-US"), "en");
/// assert_eq!(primary_subtag("es_MX"), "es");
/// assert_eq!(primary_subtag("fr"), "fr");
/// ```
pub fn primary_subtag(tag: &str) -> &str {
    match tag.find(is_separator) {
        Some(idx) => &tag[..idx],
        None => tag,
    }
}

/// Candidate bundle locales for a tag, most specific first:
/// the exact tag, its primary subtag, then the default locale.
///
/// Duplicates are removed so callers can stop at the first hit without
/// retrying the same key.
pub fn candidates<'a>(tag: &'a str, default_locale: &'a str) -> Vec<&'a str> {
    let mut out = Vec::with_capacity(3);
    for candidate in [tag, primary_subtag(tag), default_locale] {
        if !candidate.is_empty() && !out.contains(&candidate) {
            out.push(candidate);
        }
    }
    out
}

//! Positional `%s` templates.
//!
//! `%s` is replaced by the next argument, `%%` renders a literal `%`. Any other
//! `%` sequence is left untouched.

use regex::Regex;
use std::sync::OnceLock;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

fn placeholder_regex() -> &'static Regex {
    PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"%[%s]").expect("placeholder pattern is valid"))
}

/// Number of `%s` placeholders in a template.
pub fn placeholder_count(template: &str) -> usize {
    placeholder_regex()
        .find_iter(template)
        .filter(|m| m.as_str() == "%s")
        .count()
}

/// Substitute `args` into `template` in order.
///
/// Returns `None` when the number of placeholders differs from `args.len()`.
pub fn render(template: &str, args: &[&str]) -> Option<String> {
    if placeholder_count(template) != args.len() {
        return None;
    }

    let mut remaining = args.iter();
    let rendered = placeholder_regex().replace_all(template, |caps: &regex::Captures| {
        if &caps[0] == "%%" {
            "%".to_string()
        } else {
            // Count was checked above, so there is always a next argument.
            remaining.next().map(|arg| arg.to_string()).unwrap_or_default()
        }
    });

    Some(rendered.into_owned())
}

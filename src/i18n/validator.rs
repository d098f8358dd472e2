//! Locale bundle validation.
//!
//! Catches authoring defects before the skill starts serving: message keys
//! missing from a translation, and templates whose placeholder count differs
//! from the default locale's template for the same key.

use super::template::placeholder_count;
use std::collections::BTreeMap;

/// Errors and warnings found in a bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Defects that must stop the bundle from loading
    pub errors: Vec<String>,

    /// Suspicious content that still loads
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Validator for locale bundles.
pub struct BundleValidator;

impl BundleValidator {
    /// Validate every locale against the default locale.
    ///
    /// The default locale's key set is authoritative:
    /// - a key it defines that another locale lacks is an error
    /// - a key whose placeholder count differs from the default is an error
    /// - a key only a translation defines is a warning (it can never be
    ///   reached through fallback and is probably a typo)
    /// - an empty template is a warning
    ///
    /// A missing default locale is reported as an error as well.
    pub fn validate(
        default_locale: &str,
        locales: &BTreeMap<String, BTreeMap<String, String>>,
    ) -> ValidationReport {
        let mut report = ValidationReport::default();

        let Some(reference) = locales.get(default_locale) else {
            report
                .errors
                .push(format!("default locale '{}' is not defined", default_locale));
            return report;
        };

        for (locale, messages) in locales {
            for (key, template) in messages {
                if template.trim().is_empty() {
                    report
                        .warnings
                        .push(format!("'{}' is empty in locale '{}'", key, locale));
                }
            }

            if locale == default_locale {
                continue;
            }

            for (key, reference_template) in reference {
                match messages.get(key) {
                    None => report
                        .errors
                        .push(format!("'{}' is missing from locale '{}'", key, locale)),
                    Some(template) => {
                        let expected = placeholder_count(reference_template);
                        let found = placeholder_count(template);
                        if expected != found {
                            report.errors.push(format!(
                                "'{}' in locale '{}' has {} placeholder(s), '{}' has {}",
                                key, locale, found, default_locale, expected
                            ));
                        }
                    }
                }
            }

            for key in messages.keys() {
                if !reference.contains_key(key) {
                    report.warnings.push(format!(
                        "'{}' in locale '{}' is not defined in '{}'",
                        key, locale, default_locale
                    ));
                }
            }
        }

        report
    }

    /// Keys from `required` that the default locale does not define.
    pub fn missing_required<'a>(
        default_locale: &str,
        locales: &BTreeMap<String, BTreeMap<String, String>>,
        required: &[&'a str],
    ) -> Vec<&'a str> {
        let reference = locales.get(default_locale);
        required
            .iter()
            .copied()
            .filter(|key| reference.map_or(true, |messages| !messages.contains_key(*key)))
            .collect()
    }
}

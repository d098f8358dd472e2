//! Locale bundles and per-request translators.
//!
//! A [`LocaleBundle`] is built once at startup, validated, and then shared
//! read-only behind an `Arc`. Each request gets a [`Translator`] bound to the
//! bundle locale its tag resolves to.

use super::locale::candidates;
use super::strings::builtin_locales;
use super::template::{placeholder_count, render};
use super::validator::BundleValidator;
use crate::error::ConfigError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

/// One locale's entry in a bundle file: `{ "translation": { KEY: template } }`.
#[derive(Debug, Deserialize)]
struct BundleFileLocale {
    translation: BTreeMap<String, String>,
}

/// Locale-keyed message templates with a default locale to fall back to.
#[derive(Debug, Clone)]
pub struct LocaleBundle {
    default_locale: String,
    locales: BTreeMap<String, BTreeMap<String, String>>,
}

impl LocaleBundle {
    /// Build a bundle, rejecting it if validation reports errors.
    ///
    /// Validation warnings are logged and otherwise ignored.
    pub fn new(
        default_locale: impl Into<String>,
        locales: BTreeMap<String, BTreeMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let default_locale = default_locale.into();

        if locales.get(&default_locale).map_or(true, |m| m.is_empty()) {
            return Err(ConfigError::MissingDefaultLocale(default_locale));
        }

        let report = BundleValidator::validate(&default_locale, &locales);
        for warning in &report.warnings {
            warn!("Locale bundle: {}", warning);
        }
        if report.has_errors() {
            return Err(ConfigError::InvalidBundle(report.errors.join("; ")));
        }

        Ok(Self {
            default_locale,
            locales,
        })
    }

    /// The English and Spanish strings compiled into the binary.
    pub fn builtin(default_locale: impl Into<String>) -> Result<Self, ConfigError> {
        Self::new(default_locale, builtin_locales())
    }

    /// Parse a bundle from JSON shaped `{ locale: { "translation": { key: template } } }`.
    pub fn from_json_str(default_locale: impl Into<String>, json: &str) -> Result<Self, ConfigError> {
        let parsed: BTreeMap<String, BundleFileLocale> = serde_json::from_str(json)
            .map_err(|e| ConfigError::InvalidBundle(e.to_string()))?;
        let locales = parsed
            .into_iter()
            .map(|(locale, entry)| (locale, entry.translation))
            .collect();
        Self::new(default_locale, locales)
    }

    /// Load a bundle from a JSON file (see [`LocaleBundle::from_json_str`]).
    pub fn from_file(default_locale: impl Into<String>, path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|e| ConfigError::Load {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json_str(default_locale, &json)
    }

    /// Fail unless the default locale defines every key in `keys`.
    ///
    /// Since validation already guarantees that every other locale carries
    /// the default locale's keys, this makes every listed key resolvable for
    /// any tag.
    pub fn require_keys(&self, keys: &[&str]) -> Result<(), ConfigError> {
        match BundleValidator::missing_required(&self.default_locale, &self.locales, keys).first() {
            Some(key) => Err(ConfigError::MissingKey {
                locale: self.default_locale.clone(),
                key: key.to_string(),
            }),
            None => Ok(()),
        }
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Locale tags present in the bundle, sorted.
    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.locales.keys().map(String::as_str)
    }

    /// The bundle locale a tag resolves to: the exact tag, else its primary
    /// subtag (case-insensitive), else the default locale.
    pub fn resolve_locale(&self, tag: &str) -> &str {
        for candidate in candidates(tag, &self.default_locale) {
            if let Some((locale, _)) = self.locales.get_key_value(candidate) {
                return locale;
            }
            if let Some(locale) = self
                .locales
                .keys()
                .find(|locale| locale.eq_ignore_ascii_case(candidate))
            {
                return locale;
            }
        }
        &self.default_locale
    }

    /// Raw template for `key` in the locale `tag` resolves to.
    pub fn template(&self, tag: &str, key: &str) -> Result<&str, ConfigError> {
        let locale = self.resolve_locale(tag);
        self.locales
            .get(locale)
            .and_then(|messages| messages.get(key))
            .map(String::as_str)
            .ok_or_else(|| ConfigError::MissingKey {
                locale: locale.to_string(),
                key: key.to_string(),
            })
    }

    /// Resolve `key` for `tag` and substitute `args` into its placeholders.
    pub fn resolve(&self, tag: &str, key: &str, args: &[&str]) -> Result<String, ConfigError> {
        let template = self.template(tag, key)?;
        render(template, args).ok_or_else(|| ConfigError::PlaceholderMismatch {
            locale: self.resolve_locale(tag).to_string(),
            key: key.to_string(),
            expected: placeholder_count(template),
            found: args.len(),
        })
    }
}

/// Translation function bound to one request's locale.
#[derive(Debug, Clone)]
pub struct Translator {
    bundle: Arc<LocaleBundle>,
    tag: String,
}

impl Translator {
    pub fn new(bundle: Arc<LocaleBundle>, tag: impl Into<String>) -> Self {
        Self {
            bundle,
            tag: tag.into(),
        }
    }

    /// The locale tag the request carried.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The bundle locale the tag resolved to.
    pub fn locale(&self) -> &str {
        self.bundle.resolve_locale(&self.tag)
    }

    /// Resolve a template that takes no arguments.
    pub fn t(&self, key: &str) -> Result<String, ConfigError> {
        self.bundle.resolve(&self.tag, key, &[])
    }

    /// Resolve a template and substitute `args`.
    pub fn t_args(&self, key: &str, args: &[&str]) -> Result<String, ConfigError> {
        self.bundle.resolve(&self.tag, key, args)
    }
}

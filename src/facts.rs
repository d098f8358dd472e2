//! Localized fact lists and random fact selection.

use crate::error::ConfigError;
use rand::Rng;
use std::collections::BTreeMap;
use std::path::Path;

/// Fixed, read-only fact lists keyed by locale prefix.
#[derive(Debug, Clone)]
pub struct FactProvider {
    default_locale: String,
    lists: BTreeMap<String, Vec<String>>,
}

impl FactProvider {
    /// Build a provider. Every list must be non-empty and the default locale
    /// must have one.
    pub fn new(
        default_locale: impl Into<String>,
        lists: BTreeMap<String, Vec<String>>,
    ) -> Result<Self, ConfigError> {
        let default_locale = default_locale.into();

        if !lists.contains_key(&default_locale) {
            return Err(ConfigError::EmptyFacts(default_locale));
        }
        if let Some((locale, _)) = lists.iter().find(|(_, facts)| facts.is_empty()) {
            return Err(ConfigError::EmptyFacts(locale.clone()));
        }

        Ok(Self {
            default_locale,
            lists,
        })
    }

    /// The English and Spanish bear facts compiled into the binary.
    pub fn builtin(default_locale: impl Into<String>) -> Result<Self, ConfigError> {
        let lists = [("en", ENGLISH_FACTS), ("es", SPANISH_FACTS)]
            .into_iter()
            .map(|(locale, facts)| {
                (
                    locale.to_string(),
                    facts.iter().map(|fact| fact.to_string()).collect(),
                )
            })
            .collect();
        Self::new(default_locale, lists)
    }

    /// Parse fact lists from JSON shaped `{ locale: [fact, ...] }`.
    pub fn from_json_str(default_locale: impl Into<String>, json: &str) -> Result<Self, ConfigError> {
        let lists: BTreeMap<String, Vec<String>> = serde_json::from_str(json).map_err(|e| {
            ConfigError::Load {
                path: "<inline>".to_string(),
                reason: e.to_string(),
            }
        })?;
        Self::new(default_locale, lists)
    }

    /// Load fact lists from a JSON file (see [`FactProvider::from_json_str`]).
    pub fn from_file(default_locale: impl Into<String>, path: &Path) -> Result<Self, ConfigError> {
        let load_err = |reason: String| ConfigError::Load {
            path: path.display().to_string(),
            reason,
        };
        let json = std::fs::read_to_string(path).map_err(|e| load_err(e.to_string()))?;
        let lists: BTreeMap<String, Vec<String>> =
            serde_json::from_str(&json).map_err(|e| load_err(e.to_string()))?;
        Self::new(default_locale, lists)
    }

    /// The list a locale tag selects: the first non-default list whose key
    /// the tag begins with (`"es-MX"` selects `"es"`), else the default list.
    pub fn facts_for(&self, locale: &str) -> &[String] {
        let selected = self
            .lists
            .iter()
            .filter(|(key, _)| **key != self.default_locale)
            .find(|(key, _)| locale.starts_with(key.as_str()))
            .map(|(_, facts)| facts);

        match selected {
            Some(facts) => facts,
            // The constructor guarantees the default list exists.
            None => self
                .lists
                .get(&self.default_locale)
                .map(Vec::as_slice)
                .unwrap_or_default(),
        }
    }

    /// Pick a fact uniformly at random using the thread-local RNG.
    pub fn pick(&self, locale: &str) -> &str {
        self.pick_with(locale, &mut rand::thread_rng())
    }

    /// Pick a fact uniformly at random using `rng`.
    pub fn pick_with<R: Rng>(&self, locale: &str, rng: &mut R) -> &str {
        let facts = self.facts_for(locale);
        if facts.is_empty() {
            return "";
        }
        &facts[rng.gen_range(0..facts.len())]
    }
}

// ==================== Built-in Facts ====================

pub const ENGLISH_FACTS: &[&str] = &[
    "Did you know? Polar bears are the largest of all terrestrial bears.",
    "Did you know? Giant pandas primarily eat bamboo.",
    "Did you know? Brown bears can run at speeds of up to 35 mph.",
    "Did you know? Bears hibernate during winter to conserve energy.",
    "Did you know? Bears have an excellent sense of smell, even better than dogs.",
    "Did you know? Bears can swim long distances in search of food.",
    "Did you know? Some Native American cultures view bears as spiritual creatures.",
    "Did you know? Bears can eat up to 90 pounds of food per day before hibernating.",
];

pub const SPANISH_FACTS: &[&str] = &[
    "¿Sabías qué? Los osos polares son los más grandes de todos los osos terrestres.",
    "¿Sabías qué? El oso panda se alimenta principalmente de bambú.",
    "¿Sabías qué? Los osos pardos pueden correr a velocidades de hasta 35 mph.",
    "¿Sabías qué? Los osos hibernan durante el invierno para conservar energía.",
    "¿Sabías qué? Los osos tienen un excelente sentido del olfato, incluso mejor que el de los perros.",
    "¿Sabías qué? Los osos pueden nadar distancias largas en busca de alimento.",
    "¿Sabías qué? Algunas culturas nativas americanas ven a los osos como criaturas espirituales.",
    "¿Sabías qué? Los osos pueden comer hasta 90 libras de comida al día antes de hibernar.",
];

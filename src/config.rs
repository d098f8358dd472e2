use crate::skill::DEFAULT_TIMESTAMP_TOLERANCE_SECS;
use anyhow::{Context, Result};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,

    // Content
    pub default_locale: String,
    pub locale_bundle_path: Option<PathBuf>,
    pub facts_path: Option<PathBuf>,

    // Verification
    pub skill_id: Option<String>,
    pub timestamp_tolerance_secs: u64,

    // Response metadata
    pub user_agent: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Server
            port: std::env::var("PORT")
                .ok()
                .map(|v| v.parse().context("PORT must be a valid port number"))
                .transpose()?
                .unwrap_or(8080),

            // Content - built-in strings and facts unless a path is given
            default_locale: std::env::var("DEFAULT_LOCALE")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| "en".to_string()),
            locale_bundle_path: std::env::var("LOCALE_BUNDLE_PATH")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            facts_path: std::env::var("FACTS_PATH")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),

            // Verification
            skill_id: std::env::var("SKILL_ID")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            timestamp_tolerance_secs: std::env::var("TIMESTAMP_TOLERANCE_SECS")
                .ok()
                .map(|v| {
                    v.parse()
                        .context("TIMESTAMP_TOLERANCE_SECS must be a non-negative integer")
                })
                .transpose()?
                .unwrap_or(DEFAULT_TIMESTAMP_TOLERANCE_SECS),

            user_agent: std::env::var("USER_AGENT")
                .unwrap_or_else(|_| format!("bear-facts-skill/{}", env!("CARGO_PKG_VERSION"))),
        })
    }
}

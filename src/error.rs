//! Error types shared across the skill.
//!
//! Three families, split by when they can happen:
//!
//! - [`ConfigError`]: authoring defects in content or handler registration.
//!   Raised while the skill is being built and never at request time for a
//!   validated skill.
//! - [`HandlerFault`]: anything that goes wrong while matching or handling a
//!   request. Always recovered by the error handler.
//! - [`EnvelopeError`]: inbound payloads rejected before dispatch.

use thiserror::Error;

/// Content or registration defect detected while building the skill.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing message key '{key}' for locale '{locale}'")]
    MissingKey { locale: String, key: String },

    #[error(
        "template '{key}' for locale '{locale}' has {expected} placeholder(s) but {found} argument(s) were supplied"
    )]
    PlaceholderMismatch {
        locale: String,
        key: String,
        expected: usize,
        found: usize,
    },

    #[error("default locale '{0}' has no entries")]
    MissingDefaultLocale(String),

    #[error("fact list for locale '{0}' is empty")]
    EmptyFacts(String),

    #[error("no handler is registered for {0} requests")]
    UncoveredRequestKind(&'static str),

    #[error("invalid locale bundle: {0}")]
    InvalidBundle(String),

    #[error("failed to load content from {path}: {reason}")]
    Load { path: String, reason: String },
}

/// Failure while matching or handling a single request.
#[derive(Debug, Error)]
pub enum HandlerFault {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("no handler matched {0} request")]
    NoMatchingHandler(String),

    #[error("unsupported request type '{0}'")]
    UnsupportedRequestType(String),

    #[error("intent request carries no intent name")]
    MissingIntentName,

    #[error("no translator bound to the request context")]
    MissingTranslator,

    #[error("handler panicked: {0}")]
    Panicked(String),

    #[error("{0}")]
    Other(String),
}

/// Inbound envelope rejected before it reaches the dispatcher.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("malformed request envelope: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("request envelope does not carry the expected skill id")]
    SkillIdMismatch,

    #[error("request envelope carries no timestamp")]
    MissingTimestamp,

    #[error("request timestamp is {age_secs}s away from now, tolerance is {tolerance_secs}s")]
    StaleTimestamp { age_secs: i64, tolerance_secs: i64 },
}

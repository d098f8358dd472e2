//! Checks applied to an envelope before it is dispatched.

use super::envelope::RequestEnvelope;
use crate::error::EnvelopeError;
use chrono::{DateTime, Utc};
use subtle::ConstantTimeEq;

/// Default maximum distance between a request's timestamp and now.
pub const DEFAULT_TIMESTAMP_TOLERANCE_SECS: u64 = 150;

/// Constant-time string comparison, used for the skill id.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[derive(Debug, Clone, Default)]
pub struct EnvelopeVerifier {
    skill_id: Option<String>,
    timestamp_tolerance_secs: Option<i64>,
}

impl EnvelopeVerifier {
    /// A verifier that accepts everything.
    pub fn permissive() -> Self {
        Self::default()
    }

    /// Require the envelope's application id to equal `skill_id`.
    pub fn with_skill_id(mut self, skill_id: impl Into<String>) -> Self {
        self.skill_id = Some(skill_id.into());
        self
    }

    /// Reject requests whose timestamp is more than `secs` away from now.
    /// `0` disables the check.
    pub fn with_timestamp_tolerance(mut self, secs: u64) -> Self {
        self.timestamp_tolerance_secs = (secs > 0).then(|| i64::try_from(secs).unwrap_or(i64::MAX));
        self
    }

    pub fn verify(&self, envelope: &RequestEnvelope) -> Result<(), EnvelopeError> {
        self.verify_at(envelope, Utc::now())
    }

    /// Verify against an explicit clock.
    pub fn verify_at(&self, envelope: &RequestEnvelope, now: DateTime<Utc>) -> Result<(), EnvelopeError> {
        if let Some(expected) = &self.skill_id {
            let matches = envelope
                .application_id()
                .is_some_and(|actual| constant_time_compare(actual, expected));
            if !matches {
                return Err(EnvelopeError::SkillIdMismatch);
            }
        }

        if let Some(tolerance_secs) = self.timestamp_tolerance_secs {
            let timestamp = envelope
                .request
                .timestamp
                .ok_or(EnvelopeError::MissingTimestamp)?;
            let age_secs = (now - timestamp).num_seconds().abs();
            if age_secs > tolerance_secs {
                return Err(EnvelopeError::StaleTimestamp {
                    age_secs,
                    tolerance_secs,
                });
            }
        }

        Ok(())
    }
}

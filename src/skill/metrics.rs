//! Dispatch metrics.
//!
//! Counters for requests seen, handled, recovered by the error handler and
//! rejected before dispatch, plus per-kind request totals.

use super::request::RequestKind;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct DispatchMetrics {
    /// Requests that entered the dispatch cycle
    requests: AtomicUsize,

    /// Requests answered by a registered handler
    handled: AtomicUsize,

    /// Requests answered by the error handler
    errors: AtomicUsize,

    /// Envelopes rejected before dispatch (malformed or failed verification)
    rejected: AtomicUsize,

    launch_requests: AtomicUsize,
    intent_requests: AtomicUsize,
    session_ended_requests: AtomicUsize,
}

impl DispatchMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a request entering dispatch. Unsupported requests only count
    /// towards the total.
    pub fn record_request(&self, kind: RequestKind) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        let counter = match kind {
            RequestKind::Launch => &self.launch_requests,
            RequestKind::Intent => &self.intent_requests,
            RequestKind::SessionEnded => &self.session_ended_requests,
            RequestKind::Unsupported => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_handled(&self) {
        self.handled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }

    pub fn handled(&self) -> usize {
        self.handled.load(Ordering::Relaxed)
    }

    pub fn errors(&self) -> usize {
        self.errors.load(Ordering::Relaxed)
    }

    pub fn rejected(&self) -> usize {
        self.rejected.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let requests = self.requests();
        let errors = self.errors();
        let error_rate = if requests > 0 {
            (errors as f64 / requests as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            requests,
            handled: self.handled(),
            errors,
            rejected: self.rejected(),
            error_rate,
            launch_requests: self.launch_requests.load(Ordering::Relaxed),
            intent_requests: self.intent_requests.load(Ordering::Relaxed),
            session_ended_requests: self.session_ended_requests.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of the dispatch counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsReport {
    pub requests: usize,
    pub handled: usize,
    pub errors: usize,
    pub rejected: usize,

    /// Share of requests answered by the error handler, as a percentage (0-100)
    pub error_rate: f64,

    pub launch_requests: usize,
    pub intent_requests: usize,
    pub session_ended_requests: usize,
}

//! Ordered request routing.
//!
//! Handlers are registered as (matcher, function) pairs. The first matcher
//! that accepts a request wins, so specific entries must come before generic
//! ones. Matchers are plain data, which lets the dispatcher check at build
//! time that no request kind can fall through every entry.

use super::context::RequestContext;
use super::request::{Request, RequestKind};
use super::response::Response;
use crate::error::{ConfigError, HandlerFault};
use crate::i18n::strings::FALLBACK_APOLOGY;
use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::error;

/// Handler function for one request.
pub type HandlerFn =
    Arc<dyn Fn(&Request, &RequestContext) -> Result<Response, HandlerFault> + Send + Sync>;

/// Error handler: turns any fault into a response and never fails.
pub type ErrorHandlerFn =
    Arc<dyn Fn(&Request, &RequestContext, &HandlerFault) -> Response + Send + Sync>;

/// Which requests an entry applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    /// Every request of this kind.
    Kind(RequestKind),
    /// Intent requests whose name equals one of these names exactly.
    Intent(Vec<String>),
    /// Every intent request.
    AnyIntent,
    /// Every request.
    Any,
}

impl Matcher {
    pub fn intents(names: &[&str]) -> Self {
        Matcher::Intent(names.iter().map(|name| name.to_string()).collect())
    }

    pub fn matches(&self, request: &Request) -> bool {
        match self {
            Matcher::Kind(kind) => request.kind() == *kind,
            Matcher::Intent(names) => {
                request.kind() == RequestKind::Intent
                    && request
                        .intent_name()
                        .is_some_and(|name| names.iter().any(|n| n == name))
            }
            Matcher::AnyIntent => request.kind() == RequestKind::Intent,
            Matcher::Any => true,
        }
    }

    /// True if this matcher accepts every request of `kind`.
    fn covers(&self, kind: RequestKind) -> bool {
        match self {
            Matcher::Kind(k) => *k == kind,
            Matcher::Intent(_) => false,
            Matcher::AnyIntent => kind == RequestKind::Intent,
            Matcher::Any => true,
        }
    }

    /// True if this matcher names `intent` explicitly.
    fn names_intent(&self, intent: &str) -> bool {
        matches!(self, Matcher::Intent(names) if names.iter().any(|n| n == intent))
    }
}

/// A registered (matcher, handler) pair.
#[derive(Clone)]
pub struct HandlerEntry {
    name: String,
    matcher: Matcher,
    handle: HandlerFn,
}

impl HandlerEntry {
    pub fn new<F>(name: impl Into<String>, matcher: Matcher, handle: F) -> Self
    where
        F: Fn(&Request, &RequestContext) -> Result<Response, HandlerFault> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            matcher,
            handle: Arc::new(handle),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }
}

impl fmt::Debug for HandlerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerEntry")
            .field("name", &self.name)
            .field("matcher", &self.matcher)
            .finish_non_exhaustive()
    }
}

/// Immutable, ordered handler table plus the error handler.
#[derive(Clone)]
pub struct Dispatcher {
    entries: Vec<HandlerEntry>,
    error_handler: ErrorHandlerFn,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Build a dispatcher, failing if some request kind would match no entry.
    pub fn new(entries: Vec<HandlerEntry>, error_handler: ErrorHandlerFn) -> Result<Self, ConfigError> {
        for kind in RequestKind::ALL {
            if !entries.iter().any(|entry| entry.matcher.covers(kind)) {
                return Err(ConfigError::UncoveredRequestKind(kind.as_type()));
            }
        }
        Ok(Self {
            entries,
            error_handler,
        })
    }

    pub fn entries(&self) -> &[HandlerEntry] {
        &self.entries
    }

    /// First entry, in registration order, that accepts the request.
    pub fn select(&self, request: &Request) -> Option<&HandlerEntry> {
        self.entries.iter().find(|entry| entry.matcher.matches(request))
    }

    /// Match and handle a request.
    ///
    /// Returns the name of the handler that produced the response. A handler
    /// error or panic, or an unsupported request, is returned as a fault for
    /// [`Dispatcher::recover`].
    pub fn dispatch(
        &self,
        request: &Request,
        context: &RequestContext,
    ) -> Result<(&str, Response), HandlerFault> {
        if request.kind() == RequestKind::Unsupported {
            return Err(HandlerFault::UnsupportedRequestType(
                request.request_type().to_string(),
            ));
        }

        let entry = self
            .select(request)
            .ok_or_else(|| HandlerFault::NoMatchingHandler(request.kind().to_string()))?;

        let outcome = catch_unwind(AssertUnwindSafe(|| (entry.handle)(request, context)))
            .map_err(|payload| HandlerFault::Panicked(panic_message(payload.as_ref())))?;

        outcome.map(|response| (entry.name.as_str(), response))
    }

    /// Run the error handler for a fault.
    ///
    /// If the error handler itself panics, the built-in apology is returned so
    /// the caller always gets a well-formed response.
    pub fn recover(
        &self,
        request: &Request,
        context: &RequestContext,
        fault: &HandlerFault,
    ) -> Response {
        catch_unwind(AssertUnwindSafe(|| (self.error_handler)(request, context, fault)))
            .unwrap_or_else(|payload| {
                error!("Error handler panicked: {}", panic_message(payload.as_ref()));
                Response::speak(FALLBACK_APOLOGY).reprompt(FALLBACK_APOLOGY)
            })
    }

    /// Declared intent names that no entry names explicitly, i.e. that only a
    /// generic entry (such as an intent reflector) would catch.
    pub fn unhandled_intents(&self, declared: &[&str]) -> Vec<String> {
        declared
            .iter()
            .filter(|intent| !self.entries.iter().any(|entry| entry.matcher.names_intent(intent)))
            .map(|intent| intent.to_string())
            .collect()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

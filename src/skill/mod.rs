//! Request dispatch for the voice skill.
//!
//! A [`Skill`] owns the handler table and the interceptor chains. One call to
//! [`Skill::handle`] is one dispatch cycle:
//!
//! 1. request interceptors fill in a fresh [`RequestContext`]
//! 2. the first matching handler runs, or the error handler if anything
//!    faulted
//! 3. response interceptors observe the result
//!
//! # Example
//!
//! ```rust
//! use bear_facts_skill::facts::FactProvider;
//! use bear_facts_skill::i18n::LocaleBundle;
//! use bear_facts_skill::skill::{Request, Skill};
//! use std::sync::Arc;
//!
//! let bundle = Arc::new(LocaleBundle::builtin("en").unwrap());
//! let facts = Arc::new(FactProvider::builtin("en").unwrap());
//! let skill = Skill::bear_facts(bundle, facts, None).unwrap();
//!
//! let response = skill.handle(&Request::intent("AMAZON.StopIntent", "es-MX"));
//! assert_eq!(response.speech_text(), "¡Adiós popó!");
//! assert!(response.should_end_session());
//! ```

mod context;
mod dispatcher;
pub mod envelope;
pub mod handlers;
mod interceptors;
mod metrics;
mod request;
mod response;
mod verifier;

pub use context::RequestContext;
pub use dispatcher::{Dispatcher, ErrorHandlerFn, HandlerEntry, HandlerFn, Matcher};
pub use envelope::{RequestEnvelope, ResponseEnvelope};
pub use interceptors::{
    LocalizationInterceptor, LoggingRequestInterceptor, LoggingResponseInterceptor,
    RequestInterceptor, ResponseInterceptor,
};
pub use metrics::{DispatchMetrics, MetricsReport};
pub use request::{Request, RequestKind};
pub use response::Response;
pub use verifier::{EnvelopeVerifier, DEFAULT_TIMESTAMP_TOLERANCE_SECS};

use crate::config::Config;
use crate::error::{ConfigError, HandlerFault};
use crate::facts::FactProvider;
use crate::i18n::{strings, LocaleBundle};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A fully assembled skill. Immutable after [`SkillBuilder::build`] apart
/// from its metrics counters.
pub struct Skill {
    dispatcher: Dispatcher,
    request_interceptors: Vec<Box<dyn RequestInterceptor>>,
    response_interceptors: Vec<Box<dyn ResponseInterceptor>>,
    user_agent: Option<String>,
    metrics: DispatchMetrics,
}

impl fmt::Debug for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Skill")
            .field("dispatcher", &self.dispatcher)
            .field("request_interceptors", &self.request_interceptors.len())
            .field("response_interceptors", &self.response_interceptors.len())
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

impl Skill {
    pub fn builder(bundle: Arc<LocaleBundle>) -> SkillBuilder {
        SkillBuilder::new(bundle)
    }

    /// The bear facts skill: its handlers, error handler and interceptors,
    /// registered in their required order.
    pub fn bear_facts(
        bundle: Arc<LocaleBundle>,
        facts: Arc<FactProvider>,
        user_agent: Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Skill::builder(Arc::clone(&bundle))
            .add_request_handlers(handlers::default_entries(facts))
            .error_handler(handlers::error_handler)
            .add_request_interceptor(LocalizationInterceptor::new(bundle))
            .add_request_interceptor(LoggingRequestInterceptor)
            .add_response_interceptor(LoggingResponseInterceptor)
            .require_keys(strings::REQUIRED_KEYS)
            .declared_intents(handlers::DECLARED_INTENTS);
        if let Some(user_agent) = user_agent {
            builder = builder.with_user_agent(user_agent);
        }
        builder.build()
    }

    /// Load content named by the configuration (or the built-in content) and
    /// assemble the bear facts skill.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let bundle = match &config.locale_bundle_path {
            Some(path) => {
                info!("Loading locale bundle from {}", path.display());
                LocaleBundle::from_file(config.default_locale.as_str(), path)?
            }
            None => LocaleBundle::builtin(config.default_locale.as_str())?,
        };
        let facts = match &config.facts_path {
            Some(path) => {
                info!("Loading facts from {}", path.display());
                FactProvider::from_file(config.default_locale.as_str(), path)?
            }
            None => FactProvider::builtin(config.default_locale.as_str())?,
        };
        Self::bear_facts(
            Arc::new(bundle),
            Arc::new(facts),
            Some(config.user_agent.clone()),
        )
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn metrics(&self) -> &DispatchMetrics {
        &self.metrics
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    /// Run one dispatch cycle. Always returns a response.
    pub fn handle(&self, request: &Request) -> Response {
        self.metrics.record_request(request.kind());
        let mut context = RequestContext::new(request.locale());

        // Every request interceptor runs; the first failure replaces dispatch.
        let mut interceptor_fault = None;
        for interceptor in &self.request_interceptors {
            if let Err(fault) = interceptor.process(request, &mut context) {
                warn!("Request interceptor failed: {}", fault);
                interceptor_fault.get_or_insert(fault);
            }
        }

        let outcome = match interceptor_fault {
            Some(fault) => Err(fault),
            None => self
                .dispatcher
                .dispatch(request, &context)
                .map(|(handler, response)| {
                    debug!("{} handled {}", handler, request.kind());
                    response
                }),
        };

        let response = match outcome {
            Ok(response) => {
                self.metrics.record_handled();
                response
            }
            Err(fault) => {
                self.metrics.record_error();
                self.dispatcher.recover(request, &context, &fault)
            }
        };

        for interceptor in &self.response_interceptors {
            interceptor.process(request, &response);
        }

        response
    }

    /// Handle an envelope and wrap the response for the platform.
    ///
    /// Unsupported request types and intents without a name go through the
    /// same cycle as any other request and are answered by the error handler.
    pub fn handle_envelope(&self, envelope: &RequestEnvelope) -> ResponseEnvelope {
        let request = Request::from_envelope(envelope);
        self.handle(&request).to_envelope(self.user_agent.as_deref())
    }
}

/// Assembles a [`Skill`]: handlers and interceptors are kept in the order
/// they are added.
pub struct SkillBuilder {
    bundle: Arc<LocaleBundle>,
    entries: Vec<HandlerEntry>,
    error_handler: Option<ErrorHandlerFn>,
    request_interceptors: Vec<Box<dyn RequestInterceptor>>,
    response_interceptors: Vec<Box<dyn ResponseInterceptor>>,
    user_agent: Option<String>,
    required_keys: Vec<String>,
    declared_intents: Vec<String>,
}

impl SkillBuilder {
    pub fn new(bundle: Arc<LocaleBundle>) -> Self {
        Self {
            bundle,
            entries: Vec::new(),
            error_handler: None,
            request_interceptors: Vec::new(),
            response_interceptors: Vec::new(),
            user_agent: None,
            required_keys: Vec::new(),
            declared_intents: Vec::new(),
        }
    }

    pub fn add_request_handler(mut self, entry: HandlerEntry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn add_request_handlers(mut self, entries: impl IntoIterator<Item = HandlerEntry>) -> Self {
        self.entries.extend(entries);
        self
    }

    /// Set the error handler. Defaults to [`handlers::error_handler`].
    pub fn error_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Request, &RequestContext, &HandlerFault) -> Response + Send + Sync + 'static,
    {
        self.error_handler = Some(Arc::new(handler));
        self
    }

    pub fn add_request_interceptor(mut self, interceptor: impl RequestInterceptor + 'static) -> Self {
        self.request_interceptors.push(Box::new(interceptor));
        self
    }

    pub fn add_response_interceptor(mut self, interceptor: impl ResponseInterceptor + 'static) -> Self {
        self.response_interceptors.push(Box::new(interceptor));
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Message keys every handler may resolve; checked against the bundle.
    pub fn require_keys(mut self, keys: &[&str]) -> Self {
        self.required_keys.extend(keys.iter().map(|key| key.to_string()));
        self
    }

    /// Intents the interaction model declares; any without a dedicated
    /// handler is reported at build time.
    pub fn declared_intents(mut self, intents: &[&str]) -> Self {
        self.declared_intents
            .extend(intents.iter().map(|intent| intent.to_string()));
        self
    }

    pub fn build(self) -> Result<Skill, ConfigError> {
        let required: Vec<&str> = self.required_keys.iter().map(String::as_str).collect();
        self.bundle.require_keys(&required)?;

        let error_handler: ErrorHandlerFn = match self.error_handler {
            Some(handler) => handler,
            None => Arc::new(handlers::error_handler),
        };
        let dispatcher = Dispatcher::new(self.entries, error_handler)?;

        let declared: Vec<&str> = self.declared_intents.iter().map(String::as_str).collect();
        for intent in dispatcher.unhandled_intents(&declared) {
            warn!("Declared intent {} has no dedicated handler", intent);
        }

        info!(
            "Skill ready: {} handlers, {} request interceptors, {} response interceptors",
            dispatcher.entries().len(),
            self.request_interceptors.len(),
            self.response_interceptors.len()
        );

        Ok(Skill {
            dispatcher,
            request_interceptors: self.request_interceptors,
            response_interceptors: self.response_interceptors,
            user_agent: self.user_agent,
            metrics: DispatchMetrics::new(),
        })
    }
}

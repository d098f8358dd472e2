//! Steps that run around every dispatch.
//!
//! Request interceptors run before matching and may fill in the
//! [`RequestContext`]. Response interceptors run after a response exists,
//! whichever path produced it, and only observe it.

use super::context::RequestContext;
use super::request::Request;
use super::response::Response;
use crate::error::HandlerFault;
use crate::i18n::{LocaleBundle, Translator};
use std::sync::Arc;
use tracing::{debug, info};

pub trait RequestInterceptor: Send + Sync {
    fn process(&self, request: &Request, context: &mut RequestContext) -> Result<(), HandlerFault>;
}

pub trait ResponseInterceptor: Send + Sync {
    fn process(&self, request: &Request, response: &Response);
}

/// Binds a translator for the request's locale to the context.
#[derive(Debug, Clone)]
pub struct LocalizationInterceptor {
    bundle: Arc<LocaleBundle>,
}

impl LocalizationInterceptor {
    pub fn new(bundle: Arc<LocaleBundle>) -> Self {
        Self { bundle }
    }
}

impl RequestInterceptor for LocalizationInterceptor {
    fn process(&self, request: &Request, context: &mut RequestContext) -> Result<(), HandlerFault> {
        let translator = Translator::new(Arc::clone(&self.bundle), request.locale());
        debug!(
            "Locale '{}' resolved to bundle locale '{}'",
            request.locale(),
            translator.locale()
        );
        context.bind_translator(translator);
        Ok(())
    }
}

/// Logs every incoming request body.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingRequestInterceptor;

impl RequestInterceptor for LoggingRequestInterceptor {
    fn process(&self, request: &Request, _context: &mut RequestContext) -> Result<(), HandlerFault> {
        info!("Incoming request: {}", request.raw());
        Ok(())
    }
}

/// Logs every outgoing response.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingResponseInterceptor;

impl ResponseInterceptor for LoggingResponseInterceptor {
    fn process(&self, _request: &Request, response: &Response) {
        match serde_json::to_string(response) {
            Ok(json) => info!("Outgoing response: {}", json),
            Err(e) => info!("Outgoing response (unserializable: {}): {:?}", e, response),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::strings;

    #[test]
    fn test_localization_binds_translator() {
        let bundle = Arc::new(LocaleBundle::builtin("en").unwrap());
        let interceptor = LocalizationInterceptor::new(bundle);
        let request = Request::launch("es-US");
        let mut context = RequestContext::new(request.locale());

        interceptor.process(&request, &mut context).expect("binds");

        let translator = context.translator().expect("translator bound");
        assert_eq!(translator.tag(), "es-US");
        assert_eq!(context.t(strings::GOODBYE_MSG).unwrap(), "¡Adiós popó!");
    }

    #[test]
    fn test_logging_request_interceptor_leaves_context_untouched() {
        let request = Request::intent("FrasesIntent", "en-US");
        let mut context = RequestContext::new(request.locale());
        LoggingRequestInterceptor
            .process(&request, &mut context)
            .expect("logging never fails");
        assert!(context.translator().is_none());
    }

    #[test]
    fn test_logging_response_interceptor() {
        LoggingResponseInterceptor.process(&Request::launch("en"), &Response::speak("Hi"));
    }
}

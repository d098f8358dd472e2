//! The bear facts skill's request handlers.
//!
//! Registration order matters: [`default_entries`] lists specific handlers
//! first and the generic intent reflector last.

use super::context::RequestContext;
use super::dispatcher::{HandlerEntry, Matcher};
use super::request::{Request, RequestKind};
use super::response::Response;
use crate::error::HandlerFault;
use crate::facts::FactProvider;
use crate::i18n::strings::{
    ERROR_MSG, FALLBACK_APOLOGY, FALLBACK_MSG, GET_FACT_MSG, GOODBYE_MSG, HELP_MSG, REFLECTOR_MSG,
    WELCOME_MSG,
};
use std::sync::Arc;
use tracing::{error, info};

// ==================== Intent Names ====================

pub const FACT_INTENT: &str = "FrasesIntent";
pub const HELP_INTENT: &str = "AMAZON.HelpIntent";
pub const CANCEL_INTENT: &str = "AMAZON.CancelIntent";
pub const STOP_INTENT: &str = "AMAZON.StopIntent";
pub const FALLBACK_INTENT: &str = "AMAZON.FallbackIntent";
pub const NAVIGATE_HOME_INTENT: &str = "AMAZON.NavigateHomeIntent";

/// Intents declared by the skill's interaction model.
pub const DECLARED_INTENTS: &[&str] = &[
    FACT_INTENT,
    HELP_INTENT,
    CANCEL_INTENT,
    STOP_INTENT,
    FALLBACK_INTENT,
    NAVIGATE_HOME_INTENT,
];

/// Speak a message and reprompt with the same text.
fn speak_and_reprompt(speech: String) -> Response {
    Response::speak(speech.clone()).reprompt(speech)
}

pub fn launch(_request: &Request, context: &RequestContext) -> Result<Response, HandlerFault> {
    Ok(speak_and_reprompt(context.t(WELCOME_MSG)?))
}

/// Handler for the fact intent: the localized lead-in followed by a random
/// fact for the request's locale.
pub fn fact(
    facts: Arc<FactProvider>,
) -> impl Fn(&Request, &RequestContext) -> Result<Response, HandlerFault> + Send + Sync + 'static {
    move |request: &Request, context: &RequestContext| {
        let lead_in = context.t(GET_FACT_MSG)?;
        let fact = facts.pick(request.locale());
        Ok(speak_and_reprompt(format!("{}{}", lead_in, fact)))
    }
}

pub fn help(_request: &Request, context: &RequestContext) -> Result<Response, HandlerFault> {
    Ok(speak_and_reprompt(context.t(HELP_MSG)?))
}

pub fn cancel_and_stop(_request: &Request, context: &RequestContext) -> Result<Response, HandlerFault> {
    Ok(Response::speak(context.t(GOODBYE_MSG)?))
}

pub fn fallback(_request: &Request, context: &RequestContext) -> Result<Response, HandlerFault> {
    Ok(speak_and_reprompt(context.t(FALLBACK_MSG)?))
}

/// Session ended notifications get an empty response.
pub fn session_ended(request: &Request, _context: &RequestContext) -> Result<Response, HandlerFault> {
    info!("Session ended: {}", request.raw());
    Ok(Response::empty())
}

/// Repeats the name of whichever intent reached it. Registered last so it
/// only sees intents without a dedicated handler.
pub fn intent_reflector(request: &Request, context: &RequestContext) -> Result<Response, HandlerFault> {
    let intent_name = request.intent_name().ok_or(HandlerFault::MissingIntentName)?;
    Ok(speak_and_reprompt(context.t_args(REFLECTOR_MSG, &[intent_name])?))
}

/// Apologize and keep the session open. Never fails: without a usable
/// translator the built-in English apology is spoken.
pub fn error_handler(
    request: &Request,
    context: &RequestContext,
    fault: &HandlerFault,
) -> Response {
    error!("Error handled for {}: {}", request.request_type(), fault);
    let speech = context
        .t(ERROR_MSG)
        .unwrap_or_else(|_| FALLBACK_APOLOGY.to_string());
    speak_and_reprompt(speech)
}

/// The skill's handler table, in registration order.
pub fn default_entries(facts: Arc<FactProvider>) -> Vec<HandlerEntry> {
    vec![
        HandlerEntry::new("LaunchRequestHandler", Matcher::Kind(RequestKind::Launch), launch),
        HandlerEntry::new("FactIntentHandler", Matcher::intents(&[FACT_INTENT]), fact(facts)),
        HandlerEntry::new("HelpIntentHandler", Matcher::intents(&[HELP_INTENT]), help),
        HandlerEntry::new(
            "CancelAndStopIntentHandler",
            Matcher::intents(&[CANCEL_INTENT, STOP_INTENT]),
            cancel_and_stop,
        ),
        HandlerEntry::new(
            "FallbackIntentHandler",
            Matcher::intents(&[FALLBACK_INTENT]),
            fallback,
        ),
        HandlerEntry::new(
            "SessionEndedRequestHandler",
            Matcher::Kind(RequestKind::SessionEnded),
            session_ended,
        ),
        HandlerEntry::new("IntentReflectorHandler", Matcher::AnyIntent, intent_reflector),
    ]
}

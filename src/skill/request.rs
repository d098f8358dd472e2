use super::envelope::RequestEnvelope;
use serde::Serialize;
use std::fmt;

/// The request types the skill understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RequestKind {
    Launch,
    Intent,
    SessionEnded,
    /// A request type the skill has no handlers for. Never dispatched; it
    /// goes straight to the error handler.
    Unsupported,
}

impl RequestKind {
    /// Kinds the handler table must cover.
    pub const ALL: [RequestKind; 3] = [
        RequestKind::Launch,
        RequestKind::Intent,
        RequestKind::SessionEnded,
    ];

    /// Parse the envelope's `request.type` value.
    pub fn from_type(request_type: &str) -> Option<Self> {
        match request_type {
            "LaunchRequest" => Some(RequestKind::Launch),
            "IntentRequest" => Some(RequestKind::Intent),
            "SessionEndedRequest" => Some(RequestKind::SessionEnded),
            _ => None,
        }
    }

    /// The envelope's `request.type` value for this kind.
    pub fn as_type(&self) -> &'static str {
        match self {
            RequestKind::Launch => "LaunchRequest",
            RequestKind::Intent => "IntentRequest",
            RequestKind::SessionEnded => "SessionEndedRequest",
            RequestKind::Unsupported => "Unsupported",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_type())
    }
}

/// One inbound request, immutable for the duration of a dispatch cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    kind: RequestKind,
    request_type: String,
    intent_name: Option<String>,
    locale: String,
    raw: serde_json::Value,
}

impl Request {
    /// Build a request directly, without an envelope.
    ///
    /// `intent_name` is only kept for `Intent` requests.
    pub fn new(kind: RequestKind, intent_name: Option<&str>, locale: impl Into<String>) -> Self {
        let locale = locale.into();
        let intent_name = match kind {
            RequestKind::Intent => intent_name.map(str::to_string),
            _ => None,
        };
        let mut raw = serde_json::json!({ "type": kind.as_type(), "locale": locale });
        if let Some(name) = &intent_name {
            raw["intent"] = serde_json::json!({ "name": name });
        }
        Self {
            kind,
            request_type: kind.as_type().to_string(),
            intent_name,
            locale,
            raw,
        }
    }

    pub fn launch(locale: impl Into<String>) -> Self {
        Self::new(RequestKind::Launch, None, locale)
    }

    pub fn intent(name: &str, locale: impl Into<String>) -> Self {
        Self::new(RequestKind::Intent, Some(name), locale)
    }

    pub fn session_ended(locale: impl Into<String>) -> Self {
        Self::new(RequestKind::SessionEnded, None, locale)
    }

    /// Extract the request from an inbound envelope.
    ///
    /// Never fails: an unknown request type becomes
    /// [`RequestKind::Unsupported`] and an intent request without a name keeps
    /// `intent_name` empty. Both reach the error handler during dispatch, with
    /// the interceptor chains still run around them.
    pub fn from_envelope(envelope: &RequestEnvelope) -> Self {
        let body = &envelope.request;
        let kind = RequestKind::from_type(&body.request_type).unwrap_or(RequestKind::Unsupported);

        let intent_name = match kind {
            RequestKind::Intent => body
                .intent
                .as_ref()
                .map(|intent| intent.name.clone())
                .filter(|name| !name.is_empty()),
            _ => None,
        };

        // A body that was just deserialized always serializes back.
        let raw = serde_json::to_value(body).unwrap_or_default();

        Self {
            kind,
            request_type: body.request_type.clone(),
            intent_name,
            locale: envelope.locale().to_string(),
            raw,
        }
    }

    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    /// The `request.type` value as received, also for unsupported kinds.
    pub fn request_type(&self) -> &str {
        &self.request_type
    }

    /// Intent name, present only for `Intent` requests.
    pub fn intent_name(&self) -> Option<&str> {
        self.intent_name.as_deref()
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// The request body as received.
    pub fn raw(&self) -> &serde_json::Value {
        &self.raw
    }
}

use super::envelope::{OutputSpeech, Reprompt, ResponseBody, ResponseEnvelope, ENVELOPE_VERSION};
use serde::Serialize;

/// Spoken response produced for one request.
///
/// Built with [`Response::speak`] (which ends the session) and optionally
/// [`Response::reprompt`] (which keeps it open).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    speech_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reprompt_text: Option<String>,
    should_end_session: bool,
}

impl Response {
    /// A response that says `text` and ends the session.
    pub fn speak(text: impl Into<String>) -> Self {
        Self {
            speech_text: text.into(),
            reprompt_text: None,
            should_end_session: true,
        }
    }

    /// A response with no speech that ends the session.
    pub fn empty() -> Self {
        Self::speak(String::new())
    }

    /// Add a reprompt; the session stays open waiting for the user.
    pub fn reprompt(mut self, text: impl Into<String>) -> Self {
        self.reprompt_text = Some(text.into());
        self.should_end_session = false;
        self
    }

    pub fn speech_text(&self) -> &str {
        &self.speech_text
    }

    pub fn reprompt_text(&self) -> Option<&str> {
        self.reprompt_text.as_deref()
    }

    pub fn should_end_session(&self) -> bool {
        self.should_end_session
    }

    /// Wrap the response in the platform's response envelope.
    pub fn to_envelope(&self, user_agent: Option<&str>) -> ResponseEnvelope {
        let output_speech = if self.speech_text.is_empty() {
            None
        } else {
            Some(OutputSpeech::plain_text(self.speech_text.as_str()))
        };

        ResponseEnvelope {
            version: ENVELOPE_VERSION.to_string(),
            response: ResponseBody {
                output_speech,
                reprompt: self.reprompt_text.as_ref().map(|text| Reprompt {
                    output_speech: OutputSpeech::plain_text(text.as_str()),
                }),
                should_end_session: self.should_end_session,
            },
            user_agent: user_agent.map(str::to_string),
        }
    }
}

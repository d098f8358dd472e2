use crate::error::HandlerFault;
use crate::i18n::Translator;

/// Per-request scratch state.
///
/// Created empty for each request, filled in by request interceptors, then
/// read by exactly one handler (or the error handler) and dropped.
#[derive(Debug, Clone)]
pub struct RequestContext {
    locale: String,
    translator: Option<Translator>,
}

impl RequestContext {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            translator: None,
        }
    }

    /// Locale tag of the request this context belongs to.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn bind_translator(&mut self, translator: Translator) {
        self.translator = Some(translator);
    }

    pub fn translator(&self) -> Option<&Translator> {
        self.translator.as_ref()
    }

    /// Resolve a message through the bound translator.
    pub fn t(&self, key: &str) -> Result<String, HandlerFault> {
        self.t_args(key, &[])
    }

    /// Resolve a message with arguments through the bound translator.
    pub fn t_args(&self, key: &str, args: &[&str]) -> Result<String, HandlerFault> {
        let translator = self.translator.as_ref().ok_or(HandlerFault::MissingTranslator)?;
        Ok(translator.t_args(key, args)?)
    }
}

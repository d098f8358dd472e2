//! Built-in message templates.
//!
//! Templates use positional `%s` placeholders. Every key used by a handler
//! must appear in [`REQUIRED_KEYS`] so a bundle loaded from disk is checked
//! for it at startup.

use std::collections::BTreeMap;

// ==================== Message Keys ====================

pub const WELCOME_MSG: &str = "WELCOME_MSG";
pub const GET_FACT_MSG: &str = "GET_FACT_MSG";
pub const HELP_MSG: &str = "HELP_MSG";
pub const GOODBYE_MSG: &str = "GOODBYE_MSG";
pub const FALLBACK_MSG: &str = "FALLBACK_MSG";
pub const REFLECTOR_MSG: &str = "REFLECTOR_MSG";
pub const ERROR_MSG: &str = "ERROR_MSG";

/// Keys the skill's handlers resolve.
pub const REQUIRED_KEYS: &[&str] = &[
    WELCOME_MSG,
    GET_FACT_MSG,
    HELP_MSG,
    GOODBYE_MSG,
    FALLBACK_MSG,
    REFLECTOR_MSG,
    ERROR_MSG,
];

/// Apology used when no translator is available at all.
pub const FALLBACK_APOLOGY: &str = "Sorry, I had trouble doing what you asked. Please try again.";

// ==================== English Strings ====================

/// English strings (default locale)
pub const ENGLISH_STRINGS: &[(&str, &str)] = &[
    (
        WELCOME_MSG,
        "Hello! Thank you for using Bear Curiosities, to start you can say: facts about bears, \
         tell me about bears... To stop say Cancel!",
    ),
    (GET_FACT_MSG, "A fun fact is... "),
    (HELP_MSG, "You can say: tell me about bears. How can I help?"),
    (GOODBYE_MSG, "Goodbye!"),
    (FALLBACK_MSG, "Sorry, I don't know about that. Please try again."),
    (REFLECTOR_MSG, "You just triggered %s"),
    (ERROR_MSG, FALLBACK_APOLOGY),
];

// ==================== Spanish Strings ====================

/// Spanish strings
pub const SPANISH_STRINGS: &[(&str, &str)] = &[
    (
        WELCOME_MSG,
        "¡Hola! Gracias por usar Curiosidades de los Osos, para comenzar puedes decir: datos sobre \
         los osos, cuéntame sobre los osos... Para detener di ¡Cancela!",
    ),
    (GET_FACT_MSG, "Aquí te va un dato... "),
    (HELP_MSG, "Puedes decir: cuéntame sobre los osos. ¿Cómo te puedo ayudar?"),
    (GOODBYE_MSG, "¡Adiós popó!"),
    (FALLBACK_MSG, "Lo siento, no sé sobre eso. Por favor, inténtalo de nuevo."),
    (REFLECTOR_MSG, "Acabas de activar %s"),
    (
        ERROR_MSG,
        "Lo siento, tuve problemas para hacer lo que pediste. Por favor, inténtalo de nuevo.",
    ),
];

/// Built-in locale tables keyed by locale tag.
pub fn builtin_locales() -> BTreeMap<String, BTreeMap<String, String>> {
    [("en", ENGLISH_STRINGS), ("es", SPANISH_STRINGS)]
        .into_iter()
        .map(|(locale, table)| {
            let messages = table
                .iter()
                .map(|(key, template)| (key.to_string(), template.to_string()))
                .collect();
            (locale.to_string(), messages)
        })
        .collect()
}

//! Internationalization (i18n) module.
//!
//! All locale handling lives here: locale tag parsing, message templates,
//! bundle validation and the per-request translator.
//!
//! # Architecture
//!
//! - `locale`: primary/region subtags and the locale fallback order
//! - `template`: positional `%s` template rendering
//! - `strings`: built-in English and Spanish messages and their keys
//! - `validator`: authoring-time checks over a whole bundle
//! - `bundle`: `LocaleBundle` (shared, read-only) and `Translator` (per request)
//!
//! # Example
//!
//! ```rust
//! use bear_facts_skill::i18n::{strings, LocaleBundle, Translator};
//! use std::sync::Arc;
//!
//! let bundle = Arc::new(LocaleBundle::builtin("en").unwrap());
//! let translator = Translator::new(bundle, "es-MX");
//! assert_eq!(translator.t(strings::GOODBYE_MSG).unwrap(), "¡Adiós popó!");
//! ```

mod bundle;
mod locale;
pub mod strings;
mod template;
mod validator;

pub use bundle::{LocaleBundle, Translator};
pub use locale::{candidates, primary_subtag};
pub use template::{placeholder_count, render};
pub use validator::{BundleValidator, ValidationReport};

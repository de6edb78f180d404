mod cached;
mod client;
mod language;
mod prompt;
mod sse_parser;
mod translator;

pub use cached::CachedTranslator;
pub use client::{TranslationClient, TranslationRequest};
pub use language::{SUPPORTED_LANGUAGES, language_name, print_languages, validate_language};
pub use translator::{IdentityTranslator, TranslateError, Translator};

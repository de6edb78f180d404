use std::future::Future;
use thiserror::Error;

/// Why a single sentence could not be translated.
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("failed to reach translation endpoint {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("translation endpoint returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("translation stream interrupted: {0}")]
    Stream(String),

    #[error("translation came back empty")]
    Empty,
}

/// Anything that can translate one sentence between two languages.
///
/// Implementations may fail per sentence; callers decide how to recover.
pub trait Translator {
    fn translate(
        &self,
        sentence: &str,
        source_language: &str,
        target_language: &str,
    ) -> impl Future<Output = Result<String, TranslateError>> + Send;
}

/// Returns every sentence unchanged. Used when only the glossary should run.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTranslator;

impl Translator for IdentityTranslator {
    async fn translate(
        &self,
        sentence: &str,
        _source_language: &str,
        _target_language: &str,
    ) -> Result<String, TranslateError> {
        Ok(sentence.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_identity_translator_returns_input() {
        let translated = IdentityTranslator
            .translate("Hello world.", "en", "az")
            .await
            .unwrap();
        assert_eq!(translated, "Hello world.");
    }

    #[test]
    fn test_translate_error_messages() {
        assert_eq!(
            TranslateError::Stream("connection reset".to_string()).to_string(),
            "translation stream interrupted: connection reset"
        );
        assert_eq!(
            TranslateError::Empty.to_string(),
            "translation came back empty"
        );
    }
}

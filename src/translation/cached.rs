use crate::cache::CacheManager;
use crate::ui::Style;

use super::{TranslateError, TranslationClient, TranslationRequest, Translator};

/// Wraps a [`TranslationClient`] with a per-sentence SQLite cache.
///
/// Cache failures are reported as warnings and never fail a translation.
pub struct CachedTranslator {
    inner: TranslationClient,
    cache: CacheManager,
}

impl CachedTranslator {
    pub const fn new(inner: TranslationClient, cache: CacheManager) -> Self {
        Self { inner, cache }
    }

    fn request(
        &self,
        sentence: &str,
        source_language: &str,
        target_language: &str,
    ) -> TranslationRequest {
        TranslationRequest {
            source_text: sentence.to_string(),
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
            model: self.inner.model().to_string(),
            endpoint: self.inner.endpoint().to_string(),
        }
    }
}

impl Translator for CachedTranslator {
    async fn translate(
        &self,
        sentence: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, TranslateError> {
        let request = self.request(sentence, source_language, target_language);

        match self.cache.get(&request) {
            Ok(Some(cached)) => return Ok(cached),
            Ok(None) => {}
            Err(e) => {
                crate::warn!("{} cache lookup failed: {e:#}", Style::warning("Warning:"));
            }
        }

        let translated = self
            .inner
            .translate(sentence, source_language, target_language)
            .await?;

        if let Err(e) = self.cache.put(&request, &translated) {
            crate::warn!("{} cache write failed: {e:#}", Style::warning("Warning:"));
        }

        Ok(translated)
    }
}

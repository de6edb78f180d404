//! Segment → translate → join → glossary.

use futures_util::{StreamExt, stream};

use crate::glossary::GlossaryIndex;
use crate::segment::segment;
use crate::translation::{TranslateError, Translator};

/// Languages and parallelism for one pipeline.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub source_language: String,
    pub target_language: String,
    /// Maximum number of sentences translated at once (at least 1).
    pub concurrency: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            source_language: "en".to_string(),
            target_language: "az".to_string(),
            concurrency: 1,
        }
    }
}

/// The result of translating a single sentence.
#[derive(Debug)]
pub struct SentenceOutcome {
    /// 1-based position of the sentence.
    pub index: usize,
    pub total: usize,
    pub original: String,
    /// The translation, or `original` when translation failed.
    pub translated: String,
    pub error: Option<TranslateError>,
}

impl SentenceOutcome {
    /// Returns `true` if the sentence kept its original text after a failure.
    pub const fn is_fallback(&self) -> bool {
        self.error.is_some()
    }
}

/// Everything a run produced.
#[derive(Debug, Default)]
pub struct PipelineOutput {
    pub sentences: Vec<SentenceOutcome>,
    /// Translated sentences joined with single spaces, before the glossary.
    pub raw: String,
    /// Final text after glossary substitution.
    pub text: String,
}

impl PipelineOutput {
    /// Returns `true` if the glossary changed the joined translation.
    pub fn glossary_applied(&self) -> bool {
        self.raw != self.text
    }

    pub fn failures(&self) -> usize {
        self.sentences.iter().filter(|s| s.is_fallback()).count()
    }
}

/// Drives a [`Translator`] over the sentences of an input text.
pub struct Pipeline<T> {
    translator: T,
    glossary: GlossaryIndex,
    options: PipelineOptions,
}

impl<T: Translator + Sync> Pipeline<T> {
    pub const fn new(translator: T, glossary: GlossaryIndex, options: PipelineOptions) -> Self {
        Self {
            translator,
            glossary,
            options,
        }
    }

    /// Translates `text` sentence by sentence and applies the glossary.
    ///
    /// A sentence that fails to translate keeps its original text and the run
    /// continues. `on_sentence` sees every outcome in input order, even when
    /// several sentences are in flight.
    pub async fn run<F>(&self, text: &str, mut on_sentence: F) -> PipelineOutput
    where
        F: FnMut(&SentenceOutcome),
    {
        let sentences = segment(text);
        let total = sentences.len();
        if total == 0 {
            return PipelineOutput::default();
        }

        let source_language = self.options.source_language.as_str();
        let target_language = self.options.target_language.as_str();

        let translations = stream::iter(sentences)
            .map(|sentence| async move {
                let result = self
                    .translator
                    .translate(sentence, source_language, target_language)
                    .await;
                (sentence, result)
            })
            .buffered(self.options.concurrency.max(1));
        let mut translations = std::pin::pin!(translations);

        let mut outcomes = Vec::with_capacity(total);
        while let Some((sentence, result)) = translations.next().await {
            let (translated, error) = match result {
                Ok(translated) => (translated, None),
                Err(e) => (sentence.to_string(), Some(e)),
            };

            let outcome = SentenceOutcome {
                index: outcomes.len() + 1,
                total,
                original: sentence.to_string(),
                translated,
                error,
            };
            on_sentence(&outcome);
            outcomes.push(outcome);
        }

        let raw = outcomes
            .iter()
            .map(|outcome| outcome.translated.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let text = self.glossary.apply(&raw).into_owned();

        PipelineOutput {
            sentences: outcomes,
            raw,
            text,
        }
    }
}

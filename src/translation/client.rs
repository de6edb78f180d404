use futures_util::StreamExt;
use reqwest::Client;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::borrow::Cow;

use super::prompt::{SYSTEM_PROMPT_TEMPLATE, build_system_prompt};
use super::sse_parser::sse_to_text_stream;
use super::{TranslateError, Translator};

/// One sentence-level translation request, as seen by the cache.
#[derive(Debug, Clone)]
pub struct TranslationRequest {
    pub source_text: String,
    pub source_language: String,
    pub target_language: String,
    pub model: String,
    pub endpoint: String,
}

impl TranslationRequest {
    /// Compute cache key for this request
    pub fn cache_key(&self) -> String {
        let prompt_hash = Self::prompt_hash();

        let cache_input = serde_json::json!({
            "source_text": self.source_text,
            "source_language": self.source_language,
            "target_language": self.target_language,
            "model": self.model,
            "endpoint": self.endpoint,
            "prompt_hash": prompt_hash
        });

        let mut hasher = Sha256::new();
        hasher.update(cache_input.to_string().as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Compute hash of the system prompt template
    pub fn prompt_hash() -> String {
        let mut hasher = Sha256::new();
        hasher.update(SYSTEM_PROMPT_TEMPLATE.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: Cow<'a, str>,
}

/// Translator backed by an OpenAI-compatible chat completions endpoint.
#[derive(Debug, Clone)]
pub struct TranslationClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl TranslationClient {
    pub fn new(endpoint: String, model: String, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            model,
            api_key,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.endpoint.trim_end_matches('/')
        )
    }
}

impl Translator for TranslationClient {
    async fn translate(
        &self,
        sentence: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, TranslateError> {
        let url = self.completions_url();
        let system_prompt = build_system_prompt(source_language, target_language);

        let chat_request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: Cow::Owned(system_prompt),
                },
                Message {
                    role: "user",
                    content: Cow::Borrowed(sentence),
                },
            ],
            stream: true,
        };

        let mut http_request = self.client.post(&url).json(&chat_request);

        if let Some(api_key) = &self.api_key {
            http_request = http_request.header("Authorization", format!("Bearer {api_key}"));
        }

        let response = http_request
            .send()
            .await
            .map_err(|source| TranslateError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslateError::Status { status, body });
        }

        let mut stream = std::pin::pin!(sse_to_text_stream(response.bytes_stream()));
        let mut translated = String::new();
        while let Some(chunk) = stream.next().await {
            translated.push_str(&chunk?);
        }

        let translated = translated.trim();
        if translated.is_empty() {
            return Err(TranslateError::Empty);
        }

        Ok(translated.to_string())
    }
}

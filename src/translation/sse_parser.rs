//! Server-Sent Events (SSE) parser for OpenAI-compatible streaming responses.

use bytes::Bytes;
use futures_util::Stream;
use serde::Deserialize;

use super::TranslateError;

/// Response structure for streaming chat completions.
#[derive(Debug, Deserialize)]
struct StreamResponse {
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    delta: Delta,
}

#[derive(Debug, Deserialize)]
struct Delta {
    content: Option<String>,
}

const DONE_MARKER: &str = "data: [DONE]";

/// Converts a raw SSE byte stream into a stream of text chunks.
///
/// Lines may be split across network chunks; they are buffered until a
/// newline arrives. The stream ends at `data: [DONE]` or when the body ends.
/// A transport error ends the stream after yielding it.
pub fn sse_to_text_stream(
    byte_stream: impl Stream<Item = reqwest::Result<Bytes>> + Send + 'static,
) -> impl Stream<Item = Result<String, TranslateError>> + Send {
    async_stream::stream! {
        use futures_util::StreamExt;

        let mut byte_stream = std::pin::pin!(byte_stream);
        let mut buffer = String::new();

        while let Some(chunk_result) = byte_stream.next().await {
            let chunk = match chunk_result {
                Ok(c) => c,
                Err(e) => {
                    yield Err(TranslateError::Stream(e.to_string()));
                    return;
                }
            };

            buffer.push_str(&String::from_utf8_lossy(&chunk));

            while let Some(line_end) = buffer.find('\n') {
                let line: String = buffer.drain(..=line_end).collect();
                let line = line.trim();

                if line == DONE_MARKER {
                    return;
                }
                if let Some(content) = parse_sse_line(line) {
                    yield Ok(content);
                }
            }
        }

        // Some servers close the body without a trailing newline.
        if let Some(content) = parse_sse_line(buffer.trim()) {
            yield Ok(content);
        }
    }
}

/// Parses a single trimmed SSE line and extracts the text content.
///
/// Returns `None` for non-data lines, empty content, or unparsable JSON.
fn parse_sse_line(line: &str) -> Option<String> {
    let json_str = line.strip_prefix("data: ")?;

    let response = serde_json::from_str::<StreamResponse>(json_str).ok()?;

    let content: String = response
        .choices
        .into_iter()
        .filter_map(|c| c.delta.content)
        .filter(|c| !c.is_empty())
        .collect();

    if content.is_empty() {
        None
    } else {
        Some(content)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use futures_util::{StreamExt, stream};

    fn byte_stream(chunks: &'static [&'static str]) -> impl Stream<Item = reqwest::Result<Bytes>> {
        stream::iter(
            chunks
                .iter()
                .map(|chunk| Ok::<_, reqwest::Error>(Bytes::from_static(chunk.as_bytes())))
                .collect::<Vec<_>>(),
        )
    }

    async fn collect(chunks: &'static [&'static str]) -> Vec<String> {
        sse_to_text_stream(byte_stream(chunks))
            .map(|item| item.unwrap())
            .collect()
            .await
    }

    #[test]
    fn test_parse_sse_line_with_content() {
        let line = r#"data: {"choices":[{"delta":{"content":"Salam"}}]}"#;
        assert_eq!(parse_sse_line(line), Some("Salam".to_string()));
    }

    #[test]
    fn test_parse_sse_line_with_empty_content() {
        let line = r#"data: {"choices":[{"delta":{"content":""}}]}"#;
        assert_eq!(parse_sse_line(line), None);
    }

    #[test]
    fn test_parse_sse_line_with_null_content() {
        let line = r#"data: {"choices":[{"delta":{}}]}"#;
        assert_eq!(parse_sse_line(line), None);
    }

    #[test]
    fn test_parse_sse_line_multiple_choices() {
        let line =
            r#"data: {"choices":[{"delta":{"content":"Salam"}},{"delta":{"content":" dünya"}}]}"#;
        assert_eq!(parse_sse_line(line), Some("Salam dünya".to_string()));
    }

    #[test]
    fn test_parse_sse_line_ignores_non_data_lines() {
        assert_eq!(parse_sse_line(": keep-alive"), None);
        assert_eq!(parse_sse_line(""), None);
        assert_eq!(parse_sse_line("data: not json"), None);
        assert_eq!(parse_sse_line(DONE_MARKER), None);
    }

    #[tokio::test]
    async fn test_stream_joins_lines_split_across_chunks() {
        let chunks = collect(&[
            "data: {\"choices\":[{\"delta\":{\"con",
            "tent\":\"Sa\"}}]}\n\ndata: {\"choices\":[{\"delta\":{\"content\":\"lam\"}}]}\n",
            "data: [DONE]\n",
        ])
        .await;
        assert_eq!(chunks, vec!["Sa", "lam"]);
    }

    #[tokio::test]
    async fn test_stream_stops_at_done_marker() {
        let chunks = collect(&[
            "data: {\"choices\":[{\"delta\":{\"content\":\"one\"}}]}\n",
            "data: [DONE]\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"two\"}}]}\n",
        ])
        .await;
        assert_eq!(chunks, vec!["one"]);
    }

    #[tokio::test]
    async fn test_stream_flushes_unterminated_last_line() {
        let chunks = collect(&["data: {\"choices\":[{\"delta\":{\"content\":\"tail\"}}]}"]).await;
        assert_eq!(chunks, vec!["tail"]);
    }
}

//! # SSE Parser
//!
//! Server-Sent Events line parser for provider streams. Handles line
//! buffering across chunked reads, `data:` prefix extraction, `[DONE]`
//! marker filtering, and a trailing-buffer flush for upstreams (Gemini)
//! that end the stream without a final newline.

use bytes::{Bytes, BytesMut};
use futures::Stream;
use tokio_stream::StreamExt;
use tracing::warn;

/// Parse SSE lines from a byte stream and yield the raw JSON data strings.
///
/// Comments, non-`data` fields, empty payloads, and `[DONE]` markers are
/// skipped. A read error ends the stream; the caller observes it as early
/// termination and synthesizes its own error handling.
pub fn sse_data_lines<S>(byte_stream: S) -> impl Stream<Item = String> + Send
where
    S: Stream<Item = Result<Bytes, reqwest::Error>> + Send + Unpin + 'static,
{
    async_stream::stream! {
        let mut upstream = byte_stream;
        let mut buffer = BytesMut::with_capacity(8192);

        loop {
            // Drain complete lines already in the buffer.
            while let Some(newline_pos) = buffer.iter().position(|&b| b == b'\n') {
                let mut line_bytes = buffer.split_to(newline_pos + 1);
                line_bytes.truncate(line_bytes.len() - 1);
                if line_bytes.last() == Some(&b'\r') {
                    line_bytes.truncate(line_bytes.len() - 1);
                }
                let Ok(line) = std::str::from_utf8(&line_bytes) else {
                    continue; // skip invalid UTF-8 lines
                };
                if let Some(data) = extract_sse_data(line) {
                    yield data;
                }
            }

            match upstream.next().await {
                Some(Ok(chunk)) => buffer.extend_from_slice(&chunk),
                Some(Err(e)) => {
                    warn!("SSE stream read error: {e}");
                    return;
                }
                None => {
                    // Stream ended — flush whatever is left without a newline.
                    if !buffer.is_empty() {
                        if let Ok(line) = std::str::from_utf8(&buffer) {
                            if let Some(data) = extract_sse_data(line.trim()) {
                                yield data;
                            }
                        }
                    }
                    return;
                }
            }
        }
    }
}

/// Extract the data payload from a single SSE line.
///
/// Returns `Some(data)` for non-empty data lines, `None` for comments,
/// blank lines, other SSE fields, and `[DONE]` markers.
fn extract_sse_data(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with(':') {
        return None;
    }

    let data = trimmed
        .strip_prefix("data: ")
        .or_else(|| trimmed.strip_prefix("data:"))?
        .trim();

    if data.is_empty() || data == "[DONE]" {
        return None;
    }
    Some(data.to_string())
}

/// Parse JSON from an SSE data string, logging and skipping on failure.
pub fn parse_sse_data<T: serde::de::DeserializeOwned>(data: &str, provider: &str) -> Option<T> {
    match serde_json::from_str(data) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!(provider, error = %e, "failed to parse SSE data");
            None
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt as _;

    async fn collect(chunks: Vec<Result<Bytes, reqwest::Error>>) -> Vec<String> {
        futures::StreamExt::collect(sse_data_lines(futures::stream::iter(chunks))).await
    }

    // ── extract_sse_data ─────────────────────────────────────────────────

    #[test]
    fn extract_data_line() {
        assert_eq!(
            extract_sse_data("data: {\"a\":1}"),
            Some("{\"a\":1}".into())
        );
    }

    #[test]
    fn extract_data_line_without_space() {
        assert_eq!(
            extract_sse_data("data:{\"a\":1}"),
            Some("{\"a\":1}".into())
        );
    }

    #[test]
    fn extract_skips_done_marker_and_empties() {
        assert_eq!(extract_sse_data("data: [DONE]"), None);
        assert_eq!(extract_sse_data("data:"), None);
        assert_eq!(extract_sse_data(""), None);
        assert_eq!(extract_sse_data("   "), None);
    }

    #[test]
    fn extract_skips_comments_and_other_fields() {
        assert_eq!(extract_sse_data(": keepalive"), None);
        assert_eq!(extract_sse_data("event: message"), None);
        assert_eq!(extract_sse_data("id: 7"), None);
    }

    // ── sse_data_lines ───────────────────────────────────────────────────

    #[tokio::test]
    async fn single_chunk_single_event() {
        let out = collect(vec![Ok(Bytes::from("data: {\"x\":1}\n\n"))]).await;
        assert_eq!(out, vec!["{\"x\":1}"]);
    }

    #[tokio::test]
    async fn multiple_events_in_one_chunk() {
        let out = collect(vec![Ok(Bytes::from("data: {\"a\":1}\n\ndata: {\"b\":2}\n\n"))]).await;
        assert_eq!(out, vec!["{\"a\":1}", "{\"b\":2}"]);
    }

    #[tokio::test]
    async fn event_split_across_chunks() {
        let out = collect(vec![
            Ok(Bytes::from("data: {\"par")),
            Ok(Bytes::from("tial\":true}\n\n")),
        ])
        .await;
        assert_eq!(out, vec!["{\"partial\":true}"]);
    }

    #[tokio::test]
    async fn done_marker_filtered() {
        let out = collect(vec![Ok(Bytes::from("data: {\"ok\":1}\n\ndata: [DONE]\n\n"))]).await;
        assert_eq!(out, vec!["{\"ok\":1}"]);
    }

    #[tokio::test]
    async fn trailing_buffer_flushed_without_newline() {
        let out = collect(vec![Ok(Bytes::from("data: {\"tail\":true}"))]).await;
        assert_eq!(out, vec!["{\"tail\":true}"]);
    }

    #[tokio::test]
    async fn carriage_returns_stripped() {
        let out = collect(vec![Ok(Bytes::from("data: {\"cr\":1}\r\n\r\n"))]).await;
        assert_eq!(out, vec!["{\"cr\":1}"]);
    }

    #[tokio::test]
    async fn empty_stream_yields_nothing() {
        let out = collect(vec![]).await;
        assert!(out.is_empty());
    }

    // ── parse_sse_data ───────────────────────────────────────────────────

    #[test]
    fn parse_valid_json() {
        let parsed: Option<serde_json::Value> = parse_sse_data("{\"t\":\"x\"}", "test");
        assert_eq!(parsed.unwrap()["t"], "x");
    }

    #[test]
    fn parse_invalid_json_returns_none() {
        let parsed: Option<serde_json::Value> = parse_sse_data("not json", "test");
        assert!(parsed.is_none());
    }
}

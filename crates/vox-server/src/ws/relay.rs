//! Per-request relay logic: transcript in, event stream out.

use futures::StreamExt;
use tracing::{debug, warn};
use vox_core::{RelayEvent, TranscriptRequest, build_prompt};
use vox_llm::provider::TextProvider;

use super::connection::ClientConnection;

/// Handle one inbound text frame as a transcript request.
///
/// Emits zero or more `chunk` events followed by exactly one terminal
/// event: `done` on success, `error` on any failure. A failure never
/// tears down the connection; the client may send the next request on
/// the same socket.
pub async fn handle_transcript(raw: &str, provider: &dyn TextProvider, conn: &ClientConnection) {
    let request = match TranscriptRequest::parse(raw) {
        Ok(request) => request,
        Err(err) => {
            debug!(conn_id = %conn.id, error = %err, "rejected request frame");
            let _ = conn.send_event(&RelayEvent::error(err));
            return;
        }
    };

    let prompt = build_prompt(request.lang.as_deref(), &request.transcript);
    debug!(
        conn_id = %conn.id,
        lang = request.lang.as_deref().unwrap_or(vox_core::prompt::DEFAULT_LANG),
        transcript_len = request.transcript.len(),
        "relaying transcript"
    );

    let mut stream = match provider.stream_text(&prompt).await {
        Ok(stream) => stream,
        Err(err) => {
            warn!(conn_id = %conn.id, category = err.category(), error = %err, "provider request failed");
            let _ = conn.send_event(&RelayEvent::error(err));
            return;
        }
    };

    let mut full_text = String::new();
    while let Some(item) = stream.next().await {
        match item {
            Ok(delta) => {
                if delta.is_empty() {
                    continue;
                }
                full_text.push_str(&delta);
                let chunk = RelayEvent::Chunk {
                    text: delta,
                    full_text: full_text.clone(),
                };
                if !conn.send_event(&chunk) {
                    // Client gone; no point draining the rest.
                    debug!(conn_id = %conn.id, "client unreachable mid-stream");
                    return;
                }
            }
            Err(err) => {
                warn!(conn_id = %conn.id, category = err.category(), error = %err, "stream failed mid-response");
                let _ = conn.send_event(&RelayEvent::error(err));
                return;
            }
        }
    }

    debug!(conn_id = %conn.id, response_len = full_text.len(), "response complete");
    let _ = conn.send_event(&RelayEvent::Done { full_text });
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

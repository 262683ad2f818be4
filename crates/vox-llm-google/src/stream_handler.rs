//! Per-chunk processing for the Gemini SSE stream.
//!
//! Each SSE data payload becomes zero or more text deltas. Inline API
//! errors, prompt rejections, and safety-terminated candidates surface as
//! [`ProviderError`]s, which end the stream.

use vox_llm::provider::ProviderError;

use crate::types::StreamChunk;

/// Extract the text deltas carried by one stream chunk.
///
/// Returns `Err` when the chunk reports a failure instead of content:
/// an inline API error, a blocked prompt, or a candidate terminated by the
/// safety filter.
pub fn chunk_deltas(chunk: &StreamChunk) -> Result<Vec<String>, ProviderError> {
    if let Some(ref error) = chunk.error {
        return Err(ProviderError::Api {
            status: error.code,
            message: error.message.clone(),
        });
    }

    if let Some(ref feedback) = chunk.prompt_feedback {
        if let Some(ref reason) = feedback.block_reason {
            return Err(ProviderError::Other {
                message: format!("prompt blocked by safety filter: {reason}"),
            });
        }
    }

    let Some(candidate) = chunk.candidates.as_ref().and_then(|c| c.first()) else {
        return Ok(Vec::new());
    };

    if candidate.finish_reason.as_deref() == Some("SAFETY") {
        return Err(ProviderError::Other {
            message: "response blocked by safety filter".into(),
        });
    }

    let deltas = candidate
        .content
        .iter()
        .flat_map(|content| content.parts.iter())
        .filter_map(|part| part.text.clone())
        .filter(|text| !text.is_empty())
        .collect();

    Ok(deltas)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

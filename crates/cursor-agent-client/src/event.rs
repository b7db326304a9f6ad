//! Agent event wire format (stream-json mode).
//!
//! In `--output-format stream-json` mode the agent emits one JSON object per
//! line, tagged by `type`:
//!
//! ```text
//! {"type":"assistant","message":{"role":"assistant","content":[{"type":"text","text":"hi"}]},"session_id":"..."}
//! ```
//!
//! Only `assistant` events carry response text. Everything else on the
//! stream — other event types, log noise, stderr text merged into the same
//! channel — is filtered out line by line.

use serde::Deserialize;
use tracing::{error, warn};

/// One line of agent output in stream-json mode.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub message: AgentMessage,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgentMessage {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: Vec<AgentContentBlock>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentContentBlock {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub text: String,
}

/// Extract the incremental assistant text from one raw output line.
///
/// Returns `None` for anything that is not a well-formed `assistant` event:
/// blank lines, lines that do not open a JSON object (stderr noise, partial
/// framing), undecodable JSON, other event types, and assistant events with
/// an empty content list. None of these abort the stream.
pub fn decode_delta(line: &str) -> Option<String> {
    if line.is_empty() || !line.starts_with('{') {
        return None;
    }

    let event: AgentEvent = match serde_json::from_str(line) {
        Ok(event) => event,
        Err(e) => {
            error!(error = %e, "skipping undecodable agent event line");
            return None;
        }
    };

    if event.kind != "assistant" {
        return None;
    }

    // The agent normally emits exactly one content block per assistant
    // event, but an empty list must not take the stream down.
    let Some(block) = event.message.content.into_iter().next() else {
        warn!("assistant event carried no content blocks, skipping");
        return None;
    };

    Some(block.text)
}

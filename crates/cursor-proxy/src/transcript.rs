//! Chat-to-transcript flattening.
//!
//! The agent CLI takes a single plain-text prompt on stdin, not a structured
//! message list, so the chat history is folded into one line per message:
//!
//! ```text
//! system: be brief
//! user: hi
//! ```
//!
//! Embedded newlines in message text are not escaped; the `role:` prefix is
//! the only reconstruction cue. This framing is lossy by design.

use crate::types::ChatMessage;

/// Serialize the ordered message list into one flat transcript.
pub fn build_transcript(messages: &[ChatMessage]) -> String {
    let mut out = String::new();
    for msg in messages {
        out.push_str(&msg.role);
        out.push_str(": ");
        out.push_str(&msg.content.to_plaintext());
        out.push('\n');
    }
    out
}

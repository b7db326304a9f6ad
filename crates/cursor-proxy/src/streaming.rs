//! SSE framing for streaming chat completions.
//!
//! The agent subprocess emits newline-delimited JSON events; OpenAI clients
//! expect `chat.completion.chunk` objects as Server-Sent Events. This module
//! bridges the two: one role-only start frame, one content frame per decoded
//! assistant delta (arrival order, no batching), one terminal frame with
//! `finish_reason = "stop"`.
//!
//! Each frame is a `data: {json}\n\n` unit. No `data: [DONE]` terminator is
//! emitted; the finish-reason frame is the last thing the client sees. An
//! agent failure mid-stream aborts the connection without a terminal frame.

use anyhow::{Context, Result};
use async_stream::try_stream;
use cursor_agent_client::{decode_delta, AgentError};
use futures::Stream;
use tokio::sync::mpsc;
use tracing::info;

use crate::types::ChatCompletionChunk;

/// Convert the agent's line channel into a stream of SSE frames.
///
/// `created` is fixed at stream start and reused in every frame. The
/// accumulated output is kept only for the end-of-stream log line.
pub fn sse_stream(
    stream_id: String,
    created: i64,
    model: String,
    mut lines: mpsc::Receiver<Result<String, AgentError>>,
) -> impl Stream<Item = Result<String>> + Send {
    try_stream! {
        yield sse_frame(&ChatCompletionChunk::role_start(&stream_id, created, &model))?;

        let mut output = String::new();
        while let Some(item) = lines.recv().await {
            let line = item.context("agent stream failed")?;
            let Some(delta) = decode_delta(&line) else {
                continue;
            };
            output.push_str(&delta);
            yield sse_frame(&ChatCompletionChunk::content(&stream_id, created, &model, delta))?;
        }

        info!(output = %output, "chat");
        yield sse_frame(&ChatCompletionChunk::finish(&stream_id, created, &model))?;
    }
}

fn sse_frame(chunk: &ChatCompletionChunk) -> Result<String> {
    let data = serde_json::to_string(chunk).context("failed to serialize SSE chunk")?;
    Ok(format!("data: {data}\n\n"))
}

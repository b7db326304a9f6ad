//! OpenAI chat-completion wire types.
//!
//! Clients speak (a subset of) OpenAI's `/v1/chat/completions` API.
//!
//! Notes:
//! - Incoming `message.content` can be a shorthand string or an array of
//!   typed content blocks. Both are accepted via an `#[serde(untagged)]`
//!   enum; the block-list form is the canonical in-memory representation.
//! - Sampling parameters are accepted for client compatibility but never
//!   forwarded to the agent subprocess.

use serde::{Deserialize, Serialize};

/// A message in a chat-completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,

    /// OpenAI allows either a string or an array of content blocks.
    pub content: MessageContent,
}

/// Either a string shorthand or a full content block list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

impl MessageContent {
    /// Normalized block-list form. A plain string becomes exactly one text
    /// block.
    pub fn as_blocks(&self) -> Vec<ContentBlock> {
        match self {
            MessageContent::Text(s) => vec![ContentBlock {
                kind: "text".to_string(),
                text: s.clone(),
            }],
            MessageContent::Blocks(v) => v.clone(),
        }
    }

    /// Lossy plain-text representation (block texts concatenated in order).
    pub fn to_plaintext(&self) -> String {
        match self {
            MessageContent::Text(s) => s.clone(),
            MessageContent::Blocks(v) => v.iter().map(|b| b.text.as_str()).collect(),
        }
    }
}

/// One typed unit within a message's content list.
///
/// The type tag is kept as a plain string so unknown block kinds still
/// deserialize; anything without a `text` field contributes nothing to the
/// transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: String,
}

/// Request body for `POST /v1/chat/completions`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub stream: Option<bool>,

    // Sampling parameters: parsed so OpenAI clients can send them, unused by
    // the agent bridge.
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub top_p: Option<f64>,
    #[serde(default)]
    pub n: Option<u32>,
    #[serde(default)]
    pub stop: Option<serde_json::Value>,
    #[serde(default)]
    pub presence_penalty: Option<f64>,
    #[serde(default)]
    pub frequency_penalty: Option<f64>,
    #[serde(default)]
    pub user: Option<String>,
}

impl ChatCompletionRequest {
    /// `stream` defaults to false when absent.
    pub fn wants_stream(&self) -> bool {
        self.stream.unwrap_or(false)
    }
}

/// Response body for a non-streaming chat completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<Choice>,
    pub usage: Usage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    pub index: u32,
    pub message: AssistantMessage,
    pub finish_reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantMessage {
    pub role: String,
    pub content: String,
}

/// Token usage info.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl Usage {
    /// Fixed placeholder counts. The agent CLI reports no token usage, so
    /// these are never real numbers.
    pub fn placeholder() -> Self {
        Self {
            prompt_tokens: 10,
            completion_tokens: 20,
            total_tokens: 30,
        }
    }
}

/// One SSE chunk of a streaming chat completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionChunk {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<StreamChoice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamChoice {
    pub index: u32,
    pub delta: StreamDelta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl ChatCompletionChunk {
    fn with_choice(id: &str, created: i64, model: &str, choice: StreamChoice) -> Self {
        Self {
            id: id.to_string(),
            object: "chat.completion.chunk".to_string(),
            created,
            model: model.to_string(),
            choices: vec![choice],
        }
    }

    /// Start frame: role-only delta, sent once before any content.
    pub fn role_start(id: &str, created: i64, model: &str) -> Self {
        Self::with_choice(
            id,
            created,
            model,
            StreamChoice {
                index: 0,
                delta: StreamDelta {
                    role: Some("assistant".to_string()),
                    content: None,
                },
                finish_reason: None,
            },
        )
    }

    /// Content frame carrying one incremental delta.
    pub fn content(id: &str, created: i64, model: &str, text: String) -> Self {
        Self::with_choice(
            id,
            created,
            model,
            StreamChoice {
                index: 0,
                delta: StreamDelta {
                    role: None,
                    content: Some(text),
                },
                finish_reason: None,
            },
        )
    }

    /// Terminal frame: empty delta, `finish_reason = "stop"`.
    pub fn finish(id: &str, created: i64, model: &str) -> Self {
        Self::with_choice(
            id,
            created,
            model,
            StreamChoice {
                index: 0,
                delta: StreamDelta::default(),
                finish_reason: Some("stop".to_string()),
            },
        )
    }
}

/// Response body for `GET /v1/models`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub object: String,
    pub data: Vec<Model>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub owned_by: String,
    /// Never populated by this proxy; serialized as `null`.
    #[serde(default)]
    pub permission: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub root: String,
    #[serde(default)]
    pub parent: String,
}

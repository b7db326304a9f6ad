//! Cursor Proxy - OpenAI-compatible HTTP surface for the cursor-agent CLI.
//!
//! OpenAI clients speak `/v1/chat/completions`. This crate exposes that
//! surface, but instead of calling a model API it flattens the chat into a
//! plain-text transcript, feeds it to the `cursor-agent` subprocess, and
//! translates the agent's output back to OpenAI semantics (including SSE
//! streaming).
//!
//! Design goals:
//! - Accept OpenAI-style traffic (plain JSON or SSE chunk streaming).
//! - Bridge each request to one single-shot agent subprocess.
//! - Resolve the agent credential from env, a URL, or a shell script.
//! - Keep all configuration explicit: read once at startup, passed down.

pub mod auth;
pub mod config;
pub mod credentials;
pub mod server;
pub mod streaming;
pub mod transcript;
pub mod types;

pub use config::ProxyConfig;
pub use server::serve;

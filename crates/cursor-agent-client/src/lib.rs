//! Client for the `cursor-agent` CLI.
//!
//! The agent is an external executable: it reads a plain-text transcript on
//! stdin and emits either a single text blob (`--output-format text`) or one
//! JSON event per line (`--output-format stream-json`). This crate owns the
//! subprocess lifecycle and the event wire format; it knows nothing about
//! HTTP.

pub mod error;
pub mod event;
pub mod invoker;

pub use error::{AgentError, AgentResult};
pub use event::{decode_delta, AgentEvent};
pub use invoker::AgentInvocation;

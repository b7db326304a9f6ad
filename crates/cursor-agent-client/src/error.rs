//! Error types for agent subprocess invocation.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("failed to spawn agent process '{agent}': {message}")]
    Spawn { agent: String, message: String },

    #[error("agent process stdio handle unavailable: {handle}")]
    Stdio { handle: &'static str },

    #[error("agent process exited with {status}: {output}")]
    Failed {
        status: std::process::ExitStatus,
        output: String,
    },

    #[error("agent process I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AgentResult<T> = Result<T, AgentError>;

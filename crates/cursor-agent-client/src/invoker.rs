//! Agent subprocess invocation.
//!
//! One invocation = one subprocess. The transcript is delivered on stdin and
//! the channel is closed; output comes back either as a single captured
//! buffer (sync) or as a live line stream (streaming).

use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::{AgentError, AgentResult};

/// Buffered line capacity between the subprocess readers and the consumer.
const STREAM_CHANNEL_CAPACITY: usize = 64;

/// A single-shot invocation of the agent CLI.
#[derive(Debug, Clone)]
pub struct AgentInvocation {
    pub agent_path: String,
    pub model: String,
    pub api_key: String,
}

impl AgentInvocation {
    pub fn new(
        agent_path: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            agent_path: agent_path.into(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    fn command(&self, output_format: &str) -> Command {
        let mut cmd = Command::new(&self.agent_path);
        cmd.arg("--model")
            .arg(&self.model)
            .arg("--api-key")
            .arg(&self.api_key)
            .arg("--print")
            .arg("--output-format")
            .arg(output_format)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    fn spawn_error(&self, e: std::io::Error) -> AgentError {
        AgentError::Spawn {
            agent: self.agent_path.clone(),
            message: e.to_string(),
        }
    }

    /// Run the agent to completion and capture its combined output.
    ///
    /// Stdout and stderr are captured separately but returned as one buffer
    /// (stderr appended), so diagnostics from a failed run are not lost.
    pub async fn run_sync(&self, transcript: String) -> AgentResult<String> {
        let mut child = self
            .command("text")
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        let mut stdin = child.stdin.take().ok_or(AgentError::Stdio { handle: "stdin" })?;
        // Writing stdin concurrently with the output capture avoids a pipe
        // deadlock on large transcripts.
        tokio::spawn(async move {
            if let Err(e) = stdin.write_all(transcript.as_bytes()).await {
                debug!(error = %e, "agent closed stdin early");
            }
        });

        let output = child.wait_with_output().await?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            return Err(AgentError::Failed {
                status: output.status,
                output: combined,
            });
        }

        Ok(combined)
    }

    /// Spawn the agent in stream-json mode and return its output as a line
    /// channel.
    ///
    /// Stdout and stderr lines are merged onto the same channel; callers
    /// filter with [`crate::event::decode_delta`]. The channel closes when
    /// the process exits; a non-zero exit delivers one final `Err` item
    /// first. Dropping the receiver (client disconnect) kills the child
    /// immediately, even while the agent is silent between lines, so a
    /// disconnected consumer never leaks a process.
    pub async fn spawn_stream(
        &self,
        transcript: String,
    ) -> AgentResult<mpsc::Receiver<AgentResult<String>>> {
        let mut child = self
            .command("stream-json")
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        let mut stdin = child.stdin.take().ok_or(AgentError::Stdio { handle: "stdin" })?;
        let stdout = child
            .stdout
            .take()
            .ok_or(AgentError::Stdio { handle: "stdout" })?;
        let stderr = child
            .stderr
            .take()
            .ok_or(AgentError::Stdio { handle: "stderr" })?;

        let (tx, rx) = mpsc::channel(STREAM_CHANNEL_CAPACITY);

        tokio::spawn(async move {
            if let Err(e) = stdin.write_all(transcript.as_bytes()).await {
                debug!(error = %e, "agent closed stdin early");
            }
            // Dropping stdin signals end of input.
        });

        let stderr_tx = tx.clone();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                if stderr_tx.send(Ok(line)).await.is_err() {
                    return;
                }
            }
        });

        // The child lives in the stdout task. A dropped receiver (client
        // disconnect) must terminate the agent even while it is silent, so
        // the read races against channel closure instead of blocking on the
        // next line.
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            loop {
                tokio::select! {
                    line = lines.next_line() => match line {
                        Ok(Some(line)) => {
                            if tx.send(Ok(line)).await.is_err() {
                                let _ = child.kill().await;
                                return;
                            }
                        }
                        Ok(None) => break,
                        Err(e) => {
                            let _ = tx.send(Err(AgentError::Io(e))).await;
                            let _ = child.kill().await;
                            return;
                        }
                    },
                    _ = tx.closed() => {
                        let _ = child.kill().await;
                        return;
                    }
                }
            }
            match child.wait().await {
                Ok(status) if status.success() => {}
                Ok(status) => {
                    let _ = tx
                        .send(Err(AgentError::Failed {
                            status,
                            output: String::new(),
                        }))
                        .await;
                }
                Err(e) => {
                    let _ = tx.send(Err(AgentError::Io(e))).await;
                }
            }
        });

        Ok(rx)
    }
}

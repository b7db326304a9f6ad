//! Invoker tests against a fake agent executable.
//!
//! The fake agent is a small shell script written to a tempdir. It ignores
//! the CLI flags, drains stdin like the real agent, and emits whatever the
//! test needs on stdout/stderr.

use std::fs;
use std::os::unix::fs::PermissionsExt;

use cursor_agent_client::{decode_delta, AgentError, AgentInvocation};
use tempfile::TempDir;

fn write_fake_agent(dir: &TempDir, body: &str) -> String {
    let path = dir.path().join("fake-agent");
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path.to_str().unwrap().to_string()
}

fn invocation(agent_path: String) -> AgentInvocation {
    AgentInvocation::new(agent_path, "sonnet-4", "sk-test")
}

#[tokio::test]
async fn run_sync_captures_full_output() {
    let dir = TempDir::new().unwrap();
    let agent = write_fake_agent(&dir, "cat >/dev/null\nprintf 'hello'");

    let out = invocation(agent)
        .run_sync("user: hi\n".to_string())
        .await
        .unwrap();
    assert_eq!(out, "hello");
}

#[tokio::test]
async fn run_sync_delivers_transcript_on_stdin() {
    let dir = TempDir::new().unwrap();
    let agent = write_fake_agent(&dir, "cat");

    let transcript = "system: be brief\nuser: hi\n".to_string();
    let out = invocation(agent).run_sync(transcript.clone()).await.unwrap();
    assert_eq!(out, transcript);
}

#[tokio::test]
async fn run_sync_surfaces_nonzero_exit_with_output() {
    let dir = TempDir::new().unwrap();
    let agent = write_fake_agent(&dir, "cat >/dev/null\necho 'boom' >&2\nexit 3");

    let err = invocation(agent)
        .run_sync("user: hi\n".to_string())
        .await
        .unwrap_err();
    match err {
        AgentError::Failed { status, output } => {
            assert_eq!(status.code(), Some(3));
            assert!(output.contains("boom"));
        }
        other => panic!("expected Failed, got {other:?}"),
    }
}

#[tokio::test]
async fn spawn_failure_is_reported() {
    let err = invocation("/nonexistent/agent-binary".to_string())
        .run_sync("user: hi\n".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, AgentError::Spawn { .. }));
}

#[tokio::test]
async fn spawn_stream_delivers_deltas_in_order_and_filters_noise() {
    let dir = TempDir::new().unwrap();
    let agent = write_fake_agent(
        &dir,
        concat!(
            "cat >/dev/null\n",
            "echo 'starting up' >&2\n",
            "echo 'plain log line'\n",
            "echo '{\"type\":\"system\",\"message\":{\"content\":[]}}'\n",
            "echo '{\"type\":\"assistant\",\"message\":{\"role\":\"assistant\",\"content\":[{\"type\":\"text\",\"text\":\"A\"}]}}'\n",
            "echo 'not-json'\n",
            "echo '{\"type\":\"assistant\",\"message\":{\"role\":\"assistant\",\"content\":[{\"type\":\"text\",\"text\":\"B\"}]}}'",
        ),
    );

    let mut rx = invocation(agent)
        .spawn_stream("user: hi\n".to_string())
        .await
        .unwrap();

    let mut deltas = Vec::new();
    while let Some(item) = rx.recv().await {
        let line = item.unwrap();
        if let Some(delta) = decode_delta(&line) {
            deltas.push(delta);
        }
    }
    assert_eq!(deltas, vec!["A".to_string(), "B".to_string()]);
}

#[tokio::test]
async fn dropping_the_receiver_kills_a_silent_agent() {
    let dir = TempDir::new().unwrap();
    let pid_file = dir.path().join("agent.pid");
    let agent = write_fake_agent(
        &dir,
        &format!(
            concat!(
                "cat >/dev/null\n",
                "echo $$ > {pid}\n",
                "echo '{{\"type\":\"assistant\",\"message\":{{\"role\":\"assistant\",\"content\":[{{\"type\":\"text\",\"text\":\"A\"}}]}}}}'\n",
                "exec sleep 30"
            ),
            pid = pid_file.display()
        ),
    );

    let mut rx = invocation(agent)
        .spawn_stream("user: hi\n".to_string())
        .await
        .unwrap();

    // One line through proves the agent is up and mid-stream.
    let first = rx.recv().await.unwrap().unwrap();
    assert!(first.contains("assistant"));
    drop(rx);

    let pid: u32 = fs::read_to_string(&pid_file)
        .unwrap()
        .trim()
        .parse()
        .unwrap();
    let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
    loop {
        let proc_path = format!("/proc/{pid}");
        if !std::path::Path::new(&proc_path).exists() {
            break;
        }
        // A killed-but-not-yet-reaped process shows as zombie; that also
        // counts as terminated.
        let stat = fs::read_to_string(format!("{proc_path}/stat")).unwrap_or_default();
        if stat.split_whitespace().nth(2) == Some("Z") {
            break;
        }
        assert!(
            std::time::Instant::now() < deadline,
            "agent subprocess (pid {pid}) still running after receiver drop"
        );
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }
}

#[tokio::test]
async fn spawn_stream_reports_nonzero_exit_as_final_item() {
    let dir = TempDir::new().unwrap();
    let agent = write_fake_agent(&dir, "cat >/dev/null\nexit 1");

    let mut rx = invocation(agent)
        .spawn_stream("user: hi\n".to_string())
        .await
        .unwrap();

    let mut last = None;
    while let Some(item) = rx.recv().await {
        last = Some(item);
    }
    assert!(matches!(last, Some(Err(AgentError::Failed { .. }))));
}

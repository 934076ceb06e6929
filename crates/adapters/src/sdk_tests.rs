use super::*;
use crate::test_helpers::test_agent;
use herdctl_core::message::MessageKind;
use std::os::unix::fs::PermissionsExt;
use tokio::time::{timeout, Duration};
use tokio_util::sync::CancellationToken;

/// Writes a shell script that echoes its argv back as a single
/// `assistant` message, standing in for `claude` so we can assert on
/// exactly which flags an adapter passed.
fn echo_args_script(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("fake-claude.sh");
    std::fs::write(&path, "#!/bin/sh\necho \"{\\\"type\\\":\\\"assistant\\\",\\\"text\\\":\\\"$*\\\"}\"\n").unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[tokio::test]
async fn builds_expected_flags_for_a_full_agent_config() {
    let dir = tempfile::tempdir().unwrap();
    let script = echo_args_script(&dir);
    let adapter = SdkAdapter::new(script);

    let mut agent = test_agent(dir.path());
    agent.model = Some("opus".to_string());
    agent.max_turns = Some(3);
    agent.allowed_tools = vec!["Bash".to_string()];
    agent.denied_tools = vec!["WebFetch".to_string()];

    let options = InvokeOptions {
        prompt: "do the thing".to_string(),
        agent,
        session_id: Some("resume-1".to_string()),
        cancel: CancellationToken::new(),
        on_session_issued: Box::new(|_| {}),
    };

    let mut rx = adapter.invoke(options).await.unwrap();
    let message = timeout(Duration::from_secs(5), rx.recv()).await.unwrap().unwrap();
    let MessageKind::Assistant { text } = message else {
        panic!("expected assistant message echoing argv");
    };

    assert!(text.contains("--permission-mode default"));
    assert!(text.contains("--model opus"));
    assert!(text.contains("--max-turns 3"));
    assert!(text.contains("--resume resume-1"));
    assert!(text.contains("--allowed-tool Bash"));
    assert!(text.contains("--disallowed-tool WebFetch"));
}

#[tokio::test]
async fn omits_optional_flags_when_unset() {
    let dir = tempfile::tempdir().unwrap();
    let script = echo_args_script(&dir);
    let adapter = SdkAdapter::new(script);

    let options = InvokeOptions {
        prompt: "do the thing".to_string(),
        agent: test_agent(dir.path()),
        session_id: None,
        cancel: CancellationToken::new(),
        on_session_issued: Box::new(|_| {}),
    };

    let mut rx = adapter.invoke(options).await.unwrap();
    let message = timeout(Duration::from_secs(5), rx.recv()).await.unwrap().unwrap();
    let MessageKind::Assistant { text } = message else {
        panic!("expected assistant message echoing argv");
    };

    assert!(!text.contains("--resume"));
    assert!(!text.contains("--model"));
    assert!(!text.contains("--max-turns"));
}

use super::*;
use herdctl_core::message::MessageKind;
use std::path::PathBuf;
use tokio::time::{timeout, Duration};

fn noop_callback() -> crate::runtime::SessionIssuedCallback {
    Box::new(|_| {})
}

#[tokio::test]
async fn stdout_lines_become_ordered_messages() {
    let payload = format!(
        "{}\n{}\n",
        serde_json::json!({"type": "assistant", "text": "hi"}),
        serde_json::json!({"type": "system", "text": "bye"}),
    );
    let mut rx = spawn_and_stream(
        Path::new("cat"),
        &[],
        &PathBuf::from("."),
        payload,
        CancellationToken::new(),
        noop_callback(),
    )
    .await
    .unwrap();

    let first = timeout(Duration::from_secs(5), rx.recv()).await.unwrap().unwrap();
    assert_eq!(first, MessageKind::Assistant { text: "hi".to_string() });
    let second = timeout(Duration::from_secs(5), rx.recv()).await.unwrap().unwrap();
    assert_eq!(second, MessageKind::System { text: "bye".to_string() });
    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn session_id_callback_fires_once_from_any_line() {
    let payload = format!(
        "{}\n{}\n",
        serde_json::json!({"type": "system", "text": "starting", "session_id": "sess-42"}),
        serde_json::json!({"type": "system", "text": "still going", "session_id": "sess-43"}),
    );
    let seen = std::sync::Arc::new(parking_lot::Mutex::new(Vec::new()));
    let seen2 = seen.clone();
    let mut rx = spawn_and_stream(
        Path::new("cat"),
        &[],
        &PathBuf::from("."),
        payload,
        CancellationToken::new(),
        Box::new(move |id| seen2.lock().push(id)),
    )
    .await
    .unwrap();

    while timeout(Duration::from_secs(5), rx.recv()).await.unwrap().is_some() {}
    assert_eq!(seen.lock().as_slice(), ["sess-42".to_string()]);
}

#[tokio::test]
async fn malformed_lines_are_skipped_not_fatal() {
    let payload = format!(
        "not json\n{}\n{}\n",
        serde_json::json!({"type": "nonsense_kind"}),
        serde_json::json!({"type": "assistant", "text": "still works"}),
    );
    let mut rx = spawn_and_stream(
        Path::new("cat"),
        &[],
        &PathBuf::from("."),
        payload,
        CancellationToken::new(),
        noop_callback(),
    )
    .await
    .unwrap();

    let only = timeout(Duration::from_secs(5), rx.recv()).await.unwrap().unwrap();
    assert_eq!(only, MessageKind::Assistant { text: "still works".to_string() });
    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn cancellation_closes_the_stream() {
    let cancel = CancellationToken::new();
    let mut rx = spawn_and_stream(
        Path::new("sleep"),
        &["30".to_string()],
        &PathBuf::from("."),
        String::new(),
        cancel.clone(),
        noop_callback(),
    )
    .await
    .unwrap();

    cancel.cancel();
    let result = timeout(Duration::from_secs(5), rx.recv()).await.unwrap();
    assert!(result.is_none());
}

use super::*;
use crate::test_helpers::test_agent;
use tempfile::tempdir;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn invoke_always_fails() {
    let dir = tempdir().unwrap();
    let adapter = ContainerAdapter;
    let options = InvokeOptions {
        prompt: "hello".to_string(),
        agent: test_agent(dir.path()),
        session_id: None,
        cancel: CancellationToken::new(),
        on_session_issued: Box::new(|_| {}),
    };
    let err = adapter.invoke(options).await.unwrap_err();
    assert!(matches!(err, RuntimeAdapterError::RuntimeFailure(_)));
}

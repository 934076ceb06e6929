use super::*;
use crate::test_helpers::test_agent;
use std::path::PathBuf;

#[test]
fn invoke_options_carries_session_callback() {
    let called = std::sync::Arc::new(parking_lot::Mutex::new(None));
    let called2 = called.clone();
    let options = InvokeOptions {
        prompt: "hello".to_string(),
        agent: test_agent(&PathBuf::from(".")),
        session_id: None,
        cancel: CancellationToken::new(),
        on_session_issued: Box::new(move |id| *called2.lock() = Some(id)),
    };
    (options.on_session_issued)("sess-1".to_string());
    assert_eq!(*called.lock(), Some("sess-1".to_string()));
}

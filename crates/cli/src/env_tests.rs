use super::*;
use serial_test::serial;

#[test]
#[serial]
fn state_dir_prefers_herdctl_state_dir() {
    std::env::set_var("HERDCTL_STATE_DIR", "/tmp/herdctl-cli-test-state");
    std::env::remove_var("XDG_STATE_HOME");
    assert_eq!(state_dir().unwrap(), PathBuf::from("/tmp/herdctl-cli-test-state"));
    std::env::remove_var("HERDCTL_STATE_DIR");
}

#[test]
#[serial]
fn state_dir_falls_back_to_xdg_state_home() {
    std::env::remove_var("HERDCTL_STATE_DIR");
    std::env::set_var("XDG_STATE_HOME", "/tmp/xdg");
    assert_eq!(state_dir().unwrap(), PathBuf::from("/tmp/xdg/herdctl"));
    std::env::remove_var("XDG_STATE_HOME");
}

#[test]
#[serial]
fn socket_path_is_state_dir_joined_with_socket_name() {
    std::env::set_var("HERDCTL_STATE_DIR", "/tmp/herdctl-cli-test-state");
    assert_eq!(socket_path().unwrap(), PathBuf::from("/tmp/herdctl-cli-test-state/herdctld.sock"));
    std::env::remove_var("HERDCTL_STATE_DIR");
}

#[test]
#[serial]
fn ipc_timeout_defaults_to_five_seconds() {
    std::env::remove_var("HERDCTL_IPC_TIMEOUT_MS");
    assert_eq!(ipc_timeout(), Duration::from_secs(5));
}

#[test]
#[serial]
fn ipc_timeout_honors_override() {
    std::env::set_var("HERDCTL_IPC_TIMEOUT_MS", "250");
    assert_eq!(ipc_timeout(), Duration::from_millis(250));
    std::env::remove_var("HERDCTL_IPC_TIMEOUT_MS");
}

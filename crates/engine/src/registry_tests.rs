use super::*;
use herdctl_core::job::JobId;

fn job(n: u8) -> JobId {
    JobId::from_string(format!("job-2026-01-0{n}-aaaaaa"))
}

#[test]
fn counts_running_jobs_per_agent() {
    let registry = JobRegistry::new();
    registry.start(job(1), "infra.worker".to_string(), CancellationToken::new());
    registry.start(job(2), "infra.worker".to_string(), CancellationToken::new());
    registry.start(job(3), "infra.other".to_string(), CancellationToken::new());

    assert_eq!(registry.running_count("infra.worker"), 2);
    assert_eq!(registry.running_count("infra.other"), 1);
    assert_eq!(registry.running_count("infra.nobody"), 0);
}

#[test]
fn finish_removes_from_registry() {
    let registry = JobRegistry::new();
    let id = job(1);
    registry.start(id, "infra.worker".to_string(), CancellationToken::new());
    assert!(registry.is_running(&id));

    registry.finish(&id);
    assert!(!registry.is_running(&id));
    assert_eq!(registry.running_count("infra.worker"), 0);
}

#[test]
fn cancel_token_is_shared_with_the_registered_one() {
    let registry = JobRegistry::new();
    let id = job(1);
    let cancel = CancellationToken::new();
    registry.start(id, "infra.worker".to_string(), cancel.clone());

    let token = registry.cancel_token(&id).unwrap();
    token.cancel();
    assert!(cancel.is_cancelled());
}

#[test]
fn running_for_agent_lists_only_that_agents_jobs() {
    let registry = JobRegistry::new();
    registry.start(job(1), "infra.worker".to_string(), CancellationToken::new());
    registry.start(job(2), "infra.other".to_string(), CancellationToken::new());

    let running = registry.running_for_agent("infra.worker");
    assert_eq!(running, vec![job(1)]);
}

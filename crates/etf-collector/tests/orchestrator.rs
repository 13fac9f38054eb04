//! 실제 자식 프로세스를 사용하는 오케스트레이터 통합 테스트
//!
//! `sleep`, `sh`, `true`가 PATH에 있는 Unix 환경에서만 실행됩니다.

#![cfg(unix)]

use std::path::Path;
use std::time::Duration;

use etf_collector::{
    CollectorError, LaunchFailurePolicy, LaunchTarget, Orchestrator, ProcessTracker, RunOutcome,
};
use tokio_util::sync::CancellationToken;

fn sleeper() -> LaunchTarget {
    LaunchTarget::new("sleep", ["30"])
}

fn shell(script: &str) -> LaunchTarget {
    LaunchTarget::new("sh", ["-c", script])
}

fn missing_program() -> LaunchTarget {
    LaunchTarget::new("/nonexistent/etf-interpreter", ["script.py"])
}

fn is_running(pid: u32) -> bool {
    // 회수되지 않은 좀비도 /proc에 남으므로 상태까지 확인
    match std::fs::read_to_string(format!("/proc/{pid}/stat")) {
        Ok(stat) => !stat.contains(") Z "),
        Err(_) => false,
    }
}

fn force_kill(pid: u32) {
    let _ = std::process::Command::new("kill")
        .args(["-9", &pid.to_string()])
        .status();
}

#[tokio::test]
async fn test_all_children_complete() {
    let orchestrator = Orchestrator::new(
        vec![shell("exit 0"), shell("exit 3"), LaunchTarget::new("true", Vec::<String>::new())],
        LaunchFailurePolicy::Rollback,
        CancellationToken::new(),
    );

    let outcome = orchestrator.run().await.unwrap();

    let RunOutcome::Completed(stats) = outcome else {
        panic!("expected completion");
    };
    assert_eq!(stats.total, 3);
    assert_eq!(stats.success, 2);
    assert_eq!(stats.errors, 1);
    assert_eq!(stats.killed, 0);
}

#[tokio::test]
async fn test_interrupt_kills_all_children() {
    let shutdown = CancellationToken::new();
    let orchestrator = Orchestrator::new(
        vec![sleeper(), sleeper(), sleeper()],
        LaunchFailurePolicy::Rollback,
        shutdown.clone(),
    );

    let tracker = orchestrator.launch().await.unwrap();
    let pids = tracker.pids();
    assert_eq!(pids.len(), 3);

    let canceller = shutdown.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        canceller.cancel();
    });

    let outcome = tokio::time::timeout(Duration::from_secs(5), orchestrator.wait_all(tracker))
        .await
        .expect("interrupt should end the wait promptly")
        .unwrap();

    assert!(outcome.is_interrupted());
    assert_eq!(outcome.stats().killed, 3);
    if Path::new("/proc").exists() {
        for pid in pids {
            assert!(!is_running(pid), "pid {pid} still running");
        }
    }
}

#[tokio::test]
async fn test_cancelled_before_run_launches_nothing() {
    let shutdown = CancellationToken::new();
    shutdown.cancel();
    let orchestrator =
        Orchestrator::new(vec![sleeper()], LaunchFailurePolicy::Rollback, shutdown);

    let outcome = orchestrator.run().await.unwrap();

    assert!(outcome.is_interrupted());
    assert_eq!(outcome.stats().total, 0);
    assert_eq!(outcome.stats().killed, 0);
}

#[tokio::test]
async fn test_launch_failure_rolls_back_started_children() {
    let orchestrator = Orchestrator::new(
        vec![sleeper(), missing_program(), sleeper()],
        LaunchFailurePolicy::Rollback,
        CancellationToken::new(),
    );

    let err = orchestrator.run().await.unwrap_err();

    let CollectorError::Launch {
        target,
        rolled_back,
        ..
    } = err
    else {
        panic!("expected launch failure");
    };
    assert_eq!(target, "script.py");
    assert_eq!(rolled_back.len(), 1);
    if Path::new("/proc").exists() {
        assert!(!is_running(rolled_back[0]));
    }
}

#[tokio::test]
async fn test_launch_failure_can_leave_children_running() {
    let dir = tempfile::tempdir().unwrap();
    let pid_file = dir.path().join("leftover.pid");
    let first = shell(&format!("echo $$ > {}; exec sleep 30", pid_file.display()));

    let orchestrator = Orchestrator::new(
        vec![first, missing_program()],
        LaunchFailurePolicy::LeaveRunning,
        CancellationToken::new(),
    );

    let err = orchestrator.launch().await.unwrap_err();
    let CollectorError::Launch { rolled_back, .. } = err else {
        panic!("expected launch failure");
    };
    assert!(rolled_back.is_empty());

    let pid = read_pid(&pid_file).await;
    if Path::new("/proc").exists() {
        assert!(is_running(pid), "first child should still be running");
    }
    force_kill(pid);
}

#[tokio::test]
async fn test_finished_children_are_reaped_while_waiting() {
    let orchestrator = Orchestrator::new(
        vec![LaunchTarget::new("sleep", ["1"]), shell("exit 0")],
        LaunchFailurePolicy::Rollback,
        CancellationToken::new(),
    );

    let mut tracker: ProcessTracker = orchestrator.launch().await.unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;

    assert_eq!(tracker.reap_finished(), 1);
    assert!(tracker.processes()[1].status.is_some());
    assert!(tracker.processes()[0].status.is_none());

    let outcome = orchestrator.wait_all(tracker).await.unwrap();
    assert_eq!(outcome.stats().success, 2);
}

/// 자식이 기록한 PID 파일을 읽습니다.
async fn read_pid(path: &Path) -> u32 {
    for _ in 0..50 {
        if let Ok(pid) = std::fs::read_to_string(path) {
            if let Ok(pid) = pid.trim().parse() {
                return pid;
            }
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("child never wrote {}", path.display());
}

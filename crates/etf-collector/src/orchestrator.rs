//! 수집 스크립트 프로세스 오케스트레이터.
//!
//! 외부 수집 프로그램을 독립 프로세스로 순서대로 생성하고 PID를 기록한 뒤,
//! 생성 순서대로 하나씩 종료를 기다립니다.
//!
//! # 인터럽트 처리
//!
//! 전역 PID 목록 대신 `ProcessTracker` 컨텍스트 객체와 `CancellationToken`을 사용합니다.
//! 토큰이 취소되면 추적 중인 모든 프로세스를 강제 종료(SIGKILL)하고 회수한 뒤 반환합니다.
//!
//! # 생성 실패
//!
//! 중간 프로세스 생성이 실패하면 `LaunchFailurePolicy`에 따라
//! 이미 생성된 프로세스를 종료(`Rollback`)하거나 그대로 둡니다(`LeaveRunning`).

use std::fmt;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::{Duration, Instant};

use tokio::process::{Child, Command};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::error::CollectorError;
use crate::{CollectionStats, Result};

/// 대기 중이 아닌 자식 프로세스의 종료 여부를 확인하는 주기
const REAP_INTERVAL: Duration = Duration::from_millis(250);

/// 중간 프로세스 생성 실패 시 이미 생성된 프로세스 처리 방식
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LaunchFailurePolicy {
    /// 이미 생성된 프로세스를 강제 종료
    #[default]
    Rollback,
    /// 이미 생성된 프로세스를 계속 실행
    LeaveRunning,
}

/// 실행 대상 프로그램
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchTarget {
    /// 실행 파일 (PATH에서 탐색)
    pub program: String,
    pub args: Vec<String>,
    /// 작업 디렉토리 (없으면 현재 디렉토리)
    pub workdir: Option<PathBuf>,
}

impl LaunchTarget {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            workdir: None,
        }
    }

    /// `interpreter script` 형태의 대상 (인자 없음)
    pub fn script(interpreter: &str, script: &str) -> Self {
        Self::new(interpreter, [script])
    }

    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(dir.into());
        self
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if let Some(dir) = &self.workdir {
            command.current_dir(dir);
        }
        command
    }
}

impl fmt::Display for LaunchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.args.is_empty() {
            f.write_str(&self.program)
        } else {
            f.write_str(&self.args.join(" "))
        }
    }
}

/// 추적 중인 자식 프로세스
#[derive(Debug)]
pub struct TrackedProcess {
    pub target: LaunchTarget,
    pub pid: u32,
    /// 회수된 경우 종료 상태
    pub status: Option<ExitStatus>,
    child: Child,
}

/// 생성된 자식 프로세스 목록 (생성 순서).
#[derive(Debug, Default)]
pub struct ProcessTracker {
    processes: Vec<TrackedProcess>,
}

impl ProcessTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// 생성 순서대로 PID 목록
    pub fn pids(&self) -> Vec<u32> {
        self.processes.iter().map(|p| p.pid).collect()
    }

    pub fn processes(&self) -> &[TrackedProcess] {
        &self.processes
    }

    fn track(&mut self, target: LaunchTarget, child: Child) -> u32 {
        let pid = child.id().unwrap_or_default();
        self.processes.push(TrackedProcess {
            target,
            pid,
            status: None,
            child,
        });
        pid
    }

    /// 이미 종료된 자식 프로세스를 블로킹 없이 회수합니다.
    ///
    /// 이번 호출에서 새로 회수된 프로세스 수를 반환합니다.
    pub fn reap_finished(&mut self) -> usize {
        let mut reaped = 0;
        for process in self.processes.iter_mut().filter(|p| p.status.is_none()) {
            match process.child.try_wait() {
                Ok(Some(status)) => {
                    debug!(pid = process.pid, script = %process.target, %status, "프로세스 회수");
                    process.status = Some(status);
                    reaped += 1;
                }
                Ok(None) => {}
                Err(e) => warn!(pid = process.pid, error = %e, "프로세스 상태 확인 실패"),
            }
        }
        reaped
    }

    /// 실행 중인 모든 자식 프로세스를 강제 종료하고 회수한 뒤 추적 목록을 비웁니다.
    ///
    /// 실제로 종료시킨 프로세스 수를 반환합니다.
    pub async fn kill_all(&mut self) -> usize {
        self.reap_finished();

        let mut killed = 0;
        for mut process in self.processes.drain(..) {
            if process.status.is_some() {
                continue;
            }
            if let Err(e) = process.child.start_kill() {
                warn!(pid = process.pid, error = %e, "프로세스 종료 실패");
                continue;
            }
            match process.child.wait().await {
                Ok(status) => {
                    info!(pid = process.pid, script = %process.target, %status, "프로세스 강제 종료");
                    killed += 1;
                }
                Err(e) => warn!(pid = process.pid, error = %e, "종료된 프로세스 회수 실패"),
            }
        }
        killed
    }
}

/// 전체 실행 결과
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// 모든 프로세스 종료를 기다림
    Completed(CollectionStats),
    /// 인터럽트로 남은 프로세스를 강제 종료함
    Interrupted(CollectionStats),
}

impl RunOutcome {
    pub fn stats(&self) -> &CollectionStats {
        match self {
            Self::Completed(stats) | Self::Interrupted(stats) => stats,
        }
    }

    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Interrupted(_))
    }
}

/// 한 번의 대기 결과
enum WaitEvent {
    Exited(std::io::Result<ExitStatus>),
    Cancelled,
    Tick,
}

/// 수집 프로세스 오케스트레이터
pub struct Orchestrator {
    targets: Vec<LaunchTarget>,
    policy: LaunchFailurePolicy,
    shutdown: CancellationToken,
}

impl Orchestrator {
    pub fn new(
        targets: Vec<LaunchTarget>,
        policy: LaunchFailurePolicy,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            targets,
            policy,
            shutdown,
        }
    }

    pub fn targets(&self) -> &[LaunchTarget] {
        &self.targets
    }

    /// 모든 대상을 실행하고 종료를 기다립니다.
    pub async fn run(&self) -> Result<RunOutcome> {
        let tracker = self.launch().await?;
        self.wait_all(tracker).await
    }

    /// 대상을 순서대로 생성하고 PID를 기록합니다.
    ///
    /// 생성에 실패하면 정책에 따라 이미 생성된 프로세스를 처리하고
    /// `CollectorError::Launch`를 반환합니다. 취소된 뒤에는 더 생성하지 않습니다.
    pub async fn launch(&self) -> Result<ProcessTracker> {
        let mut tracker = ProcessTracker::new();

        for target in &self.targets {
            if self.shutdown.is_cancelled() {
                warn!(launched = tracker.len(), "인터럽트 수신, 프로세스 생성 중단");
                break;
            }

            match target.command().spawn() {
                Ok(child) => {
                    let pid = tracker.track(target.clone(), child);
                    info!(pid, script = %target, "프로세스 시작");
                }
                Err(source) => {
                    error!(script = %target, error = %source, "프로세스 생성 실패");
                    let rolled_back = match self.policy {
                        LaunchFailurePolicy::Rollback => {
                            let pids = tracker.pids();
                            let killed = tracker.kill_all().await;
                            warn!(killed, "이미 생성된 프로세스 롤백");
                            pids
                        }
                        LaunchFailurePolicy::LeaveRunning => {
                            warn!(running = tracker.len(), "이미 생성된 프로세스는 계속 실행됩니다");
                            Vec::new()
                        }
                    };
                    return Err(CollectorError::Launch {
                        target: target.to_string(),
                        source,
                        rolled_back,
                    });
                }
            }
        }

        Ok(tracker)
    }

    /// 생성 순서대로 하나씩 종료를 기다립니다.
    ///
    /// 대기 중에도 다른 프로세스의 종료는 주기적으로 회수합니다.
    /// 토큰이 취소되면 남은 프로세스를 모두 강제 종료한 뒤 `Interrupted`를 반환합니다.
    pub async fn wait_all(&self, mut tracker: ProcessTracker) -> Result<RunOutcome> {
        let start = Instant::now();
        let mut stats = CollectionStats::new();
        stats.total = tracker.len();

        let mut reap_tick = tokio::time::interval(REAP_INTERVAL);
        reap_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut next = 0;
        while next < tracker.processes.len() {
            let event = if self.shutdown.is_cancelled() {
                WaitEvent::Cancelled
            } else if let Some(status) = tracker.processes[next].status {
                WaitEvent::Exited(Ok(status))
            } else {
                let process = &mut tracker.processes[next];
                tokio::select! {
                    biased;
                    _ = self.shutdown.cancelled() => WaitEvent::Cancelled,
                    status = process.child.wait() => WaitEvent::Exited(status),
                    _ = reap_tick.tick() => WaitEvent::Tick,
                }
            };

            match event {
                WaitEvent::Tick => {
                    tracker.reap_finished();
                }
                WaitEvent::Cancelled => {
                    warn!("인터럽트 수신, 자식 프로세스 종료 중...");
                    stats.killed = tracker.kill_all().await;
                    stats.elapsed = start.elapsed();
                    return Ok(RunOutcome::Interrupted(stats));
                }
                WaitEvent::Exited(Err(e)) => {
                    error!(pid = tracker.processes[next].pid, error = %e, "프로세스 대기 실패");
                    tracker.kill_all().await;
                    return Err(CollectorError::Process(e));
                }
                WaitEvent::Exited(Ok(status)) => {
                    let process = &mut tracker.processes[next];
                    process.status = Some(status);
                    if status.success() {
                        stats.success += 1;
                        info!(pid = process.pid, script = %process.target, "프로세스 정상 종료");
                    } else {
                        stats.errors += 1;
                        warn!(
                            pid = process.pid,
                            script = %process.target,
                            code = ?status.code(),
                            "프로세스 비정상 종료"
                        );
                    }
                    next += 1;
                }
            }
        }

        // 취소가 첫 대기 전에 이미 일어난 경우 (대상 없음 포함)
        if self.shutdown.is_cancelled() && next == 0 {
            stats.elapsed = start.elapsed();
            return Ok(RunOutcome::Interrupted(stats));
        }

        stats.elapsed = start.elapsed();
        Ok(RunOutcome::Completed(stats))
    }
}

//! ETF 데이터 수집 오케스트레이터.
//!
//! 이 crate는 수집 스크립트를 실행하고 그 출력을 적재하는 바이너리를 제공합니다:
//! - 수집 스크립트 동시 실행 및 인터럽트 시 일괄 종료
//! - 스크립트 출력 파일을 종목별 `EtfRecord`로 적재

pub mod config;
pub mod error;
pub mod ingest;
pub mod orchestrator;
pub mod stats;

pub use config::{CollectorConfig, DataLayout, LaunchConfig};
pub use error::{CollectorError, Result};
pub use ingest::{ingest_all, ingest_ticker, select_targets, IngestTarget};
pub use orchestrator::{
    LaunchFailurePolicy, LaunchTarget, Orchestrator, ProcessTracker, RunOutcome, TrackedProcess,
};
pub use stats::CollectionStats;

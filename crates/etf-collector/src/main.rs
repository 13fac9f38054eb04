//! ETF data collector CLI.

use std::io::Write;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use etf_collector::{ingest_all, CollectorConfig, CollectorError, Orchestrator, RunOutcome};
use etf_core::{init_logging, EtfRecord, LogConfig};
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "etf-collector")]
#[command(about = "ETF Data Acquisition Harness", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// 수집 스크립트 실행 (모두 종료될 때까지 대기)
    Launch,

    /// 스크립트 출력을 레코드로 적재하여 JSON으로 출력
    Ingest {
        /// 특정 종목만 적재 (쉼표로 구분, 예: "SPY,QQQ")
        #[arg(long)]
        tickers: Option<String>,

        /// 보기 좋게 들여쓴 JSON 출력
        #[arg(long)]
        pretty: bool,
    },

    /// 전체 워크플로우 실행 (스크립트 실행 → 적재)
    RunAll {
        /// 특정 종목만 적재 (쉼표로 구분)
        #[arg(long)]
        tickers: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // 로깅 초기화
    let mut log_config = LogConfig::from_env();
    if std::env::var("RUST_LOG").is_err() {
        log_config.level = format!("etf_collector={0},etf_core={0}", cli.log_level);
    }
    init_logging(&log_config).map_err(|e| anyhow::anyhow!("로깅 초기화 실패: {e}"))?;

    tracing::info!("ETF Data Collector 시작");

    // 설정 로드
    let config = CollectorConfig::from_env()?;
    tracing::debug!(
        interpreter = %config.launch.interpreter,
        scripts = ?config.launch.scripts,
        policy = ?config.launch.on_failure,
        "설정 로드 완료"
    );

    // 프로세스 전체에서 하나의 종료 토큰을 공유 (적재 중 인터럽트도 처리)
    let shutdown = CancellationToken::new();
    tokio::spawn(shutdown_signal(shutdown.clone()));

    let code = match cli.command {
        Commands::Launch => launch(&config, &shutdown).await?.0,
        Commands::Ingest { tickers, pretty } => {
            ingest(&config, tickers.as_deref(), pretty, &shutdown)?;
            ExitCode::SUCCESS
        }
        Commands::RunAll { tickers } => {
            tracing::info!("=== 전체 워크플로우 시작 ===");

            tracing::info!("Step 1/2: 수집 스크립트 실행");
            let (code, proceed) = launch(&config, &shutdown).await?;

            if proceed {
                tracing::info!("Step 2/2: 출력 적재");
                ingest(&config, tickers.as_deref(), false, &shutdown)?;
                tracing::info!("=== 전체 워크플로우 완료 ===");
            } else {
                tracing::warn!("스크립트 실행이 끝나지 않아 적재를 건너뜁니다");
            }
            code
        }
    };

    tracing::info!("ETF Data Collector 종료");
    Ok(code)
}

/// 오케스트레이터를 실행합니다.
///
/// 종료 코드와 적재 진행 여부를 반환합니다. 인터럽트는 정상 종료로,
/// 프로세스 생성 실패는 실패 종료로 처리합니다.
async fn launch(
    config: &CollectorConfig,
    shutdown: &CancellationToken,
) -> anyhow::Result<(ExitCode, bool)> {
    let orchestrator = Orchestrator::new(
        config.launch.targets(),
        config.launch.on_failure,
        shutdown.clone(),
    );

    match orchestrator.run().await {
        Ok(RunOutcome::Completed(stats)) => {
            stats.log_summary("스크립트 실행");
            Ok((ExitCode::SUCCESS, true))
        }
        Ok(RunOutcome::Interrupted(stats)) => {
            stats.log_summary("스크립트 실행 (중단)");
            Ok((ExitCode::SUCCESS, false))
        }
        Err(e @ CollectorError::Launch { .. }) => {
            tracing::error!("스크립트 실행 실패: {}", e);
            Ok((ExitCode::FAILURE, false))
        }
        Err(e) => Err(e.into()),
    }
}

/// 레코드를 적재해 stdout에 출력합니다.
///
/// 인터럽트되면 그때까지 적재한 레코드만 출력합니다.
fn ingest(
    config: &CollectorConfig,
    tickers: Option<&str>,
    pretty: bool,
    shutdown: &CancellationToken,
) -> anyhow::Result<()> {
    let (records, stats) = ingest_all(config, tickers, shutdown)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for record in records {
        write_record(&mut out, &record, pretty)?;
        record.release();
    }
    out.flush()?;

    if shutdown.is_cancelled() {
        stats.log_summary("출력 적재 (중단)");
    } else {
        stats.log_summary("출력 적재");
    }
    Ok(())
}

fn write_record(out: &mut impl Write, record: &EtfRecord, pretty: bool) -> anyhow::Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, record)?;
    } else {
        serde_json::to_writer(&mut *out, record)?;
    }
    writeln!(out)?;
    Ok(())
}

/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 종료 토큰을 취소합니다.
async fn shutdown_signal(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Ctrl+C 핸들러 설치 실패: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("SIGTERM 핸들러 설치 실패: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Ctrl+C 수신"),
        _ = terminate => tracing::info!("SIGTERM 수신"),
    }

    shutdown_token.cancel();
}

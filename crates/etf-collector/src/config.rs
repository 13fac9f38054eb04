//! 환경변수 기반 설정 모듈.

use std::path::{Path, PathBuf};

use crate::error::CollectorError;
use crate::orchestrator::{LaunchFailurePolicy, LaunchTarget};
use crate::Result;

/// 기본 수집 스크립트 (실행 순서대로)
pub const DEFAULT_SCRIPTS: [&str; 3] = [
    "scripts/data_acquisition.py",
    "scripts/data_financials.py",
    "scripts/data_technical.py",
];

/// Collector 전체 설정
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// 스크립트 실행 설정
    pub launch: LaunchConfig,
    /// 스크립트 출력 위치
    pub layout: DataLayout,
    /// ETF 유니버스 파일
    pub etf_list_file: PathBuf,
}

/// 스크립트 실행 설정
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    /// 스크립트 인터프리터 (PATH에서 탐색)
    pub interpreter: String,
    /// 실행할 스크립트 (상대 경로)
    pub scripts: Vec<String>,
    /// 자식 프로세스 작업 디렉토리
    pub workdir: PathBuf,
    /// 중간에 생성 실패 시 이미 생성된 프로세스 처리 방식
    pub on_failure: LaunchFailurePolicy,
}

/// 스크립트 출력 디렉토리. 각 디렉토리에 `{TICKER}.json`이 생성됩니다.
#[derive(Debug, Clone)]
pub struct DataLayout {
    /// 시세 스냅샷 (`TechnicalIndicators` 포함 가능)
    pub individual_dir: PathBuf,
    /// 기술적 지표 (최상위 평탄 구조)
    pub technical_dir: PathBuf,
    /// 재무제표
    pub financials_dir: PathBuf,
    /// 투자의견/일정
    pub additional_dir: PathBuf,
}

impl CollectorConfig {
    /// 환경변수에서 설정 로드 (`.env` 파일 포함)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let scripts = match std::env::var("ETF_SCRIPTS") {
            Ok(list) => split_list(&list),
            Err(_) => DEFAULT_SCRIPTS.iter().map(|s| s.to_string()).collect(),
        };
        if scripts.is_empty() {
            return Err(CollectorError::Config(
                "ETF_SCRIPTS에 실행할 스크립트가 없습니다".to_string(),
            ));
        }

        let on_failure = if env_var_bool("ETF_ROLLBACK_ON_LAUNCH_FAILURE", true) {
            LaunchFailurePolicy::Rollback
        } else {
            LaunchFailurePolicy::LeaveRunning
        };

        Ok(Self {
            launch: LaunchConfig {
                interpreter: env_var_or("ETF_INTERPRETER", "python3"),
                scripts,
                workdir: env_var_or("ETF_WORKDIR", ".").into(),
                on_failure,
            },
            layout: DataLayout {
                individual_dir: env_var_or("ETF_INDIVIDUAL_DIR", "data/processed/ETF_individual")
                    .into(),
                technical_dir: env_var_or("ETF_TECHNICAL_DIR", "data/processed/technical").into(),
                financials_dir: env_var_or("ETF_FINANCIALS_DIR", "data/processed/financials")
                    .into(),
                additional_dir: env_var_or("ETF_ADDITIONAL_DIR", "data/processed/additional")
                    .into(),
            },
            etf_list_file: env_var_or("ETF_LIST_FILE", "data/raw/etf_list.json").into(),
        })
    }
}

impl LaunchConfig {
    /// 스크립트마다 `interpreter script` 실행 대상을 만듭니다.
    pub fn targets(&self) -> Vec<LaunchTarget> {
        self.scripts
            .iter()
            .map(|script| LaunchTarget::script(&self.interpreter, script).in_dir(&self.workdir))
            .collect()
    }
}

impl DataLayout {
    /// 모든 출력 디렉토리를 `root` 아래로 둡니다.
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            individual_dir: root.join("ETF_individual"),
            technical_dir: root.join("technical"),
            financials_dir: root.join("financials"),
            additional_dir: root.join("additional"),
        }
    }

    pub fn individual(&self, ticker: &str) -> PathBuf {
        self.individual_dir.join(format!("{ticker}.json"))
    }

    pub fn technical(&self, ticker: &str) -> PathBuf {
        self.technical_dir.join(format!("{ticker}.json"))
    }

    pub fn financials(&self, ticker: &str) -> PathBuf {
        self.financials_dir.join(format!("{ticker}.json"))
    }

    pub fn additional(&self, ticker: &str) -> PathBuf {
        self.additional_dir.join(format!("{ticker}.json"))
    }
}

/// 쉼표 구분 목록 (공백 제거, 빈 항목 무시)
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn env_var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// 환경변수에서 bool 값 파싱 (해석할 수 없으면 기본값)
fn env_var_bool(key: &str, default: bool) -> bool {
    match std::env::var(key).map(|v| v.trim().to_lowercase()) {
        Ok(v) if v == "true" || v == "1" => true,
        Ok(v) if v == "false" || v == "0" => false,
        _ => default,
    }
}

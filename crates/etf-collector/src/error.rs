//! 에러 타입 정의.

use std::fmt;

use etf_core::EtfError;

/// Collector 에러 타입
#[derive(Debug)]
pub enum CollectorError {
    /// 설정 에러
    Config(String),
    /// 프로세스 생성 실패
    Launch {
        /// 생성에 실패한 대상
        target: String,
        source: std::io::Error,
        /// 롤백으로 종료시킨 이미 생성된 프로세스 PID
        rolled_back: Vec<u32>,
    },
    /// 실행 중인 프로세스 대기/종료 에러
    Process(std::io::Error),
    /// 데이터 파싱 에러
    Data(EtfError),
}

impl fmt::Display for CollectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::Launch {
                target,
                source,
                rolled_back,
            } => write!(
                f,
                "Failed to launch {}: {} (rolled back {} process(es))",
                target,
                source,
                rolled_back.len()
            ),
            Self::Process(e) => write!(f, "Process error: {}", e),
            Self::Data(e) => write!(f, "Data error: {}", e),
        }
    }
}

impl std::error::Error for CollectorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Launch { source, .. } => Some(source),
            Self::Process(e) => Some(e),
            Self::Data(e) => Some(e),
            Self::Config(_) => None,
        }
    }
}

impl From<EtfError> for CollectorError {
    fn from(err: EtfError) -> Self {
        Self::Data(err)
    }
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, CollectorError>;

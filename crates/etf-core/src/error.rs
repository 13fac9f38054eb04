//! ETF 데이터 에러 타입.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// 레코드 파싱 및 적재 에러.
#[derive(Debug, Error)]
pub enum EtfError {
    /// 파일 열기/읽기 실패 (존재하지 않는 파일, 짧은 읽기, UTF-8 아님)
    #[error("파일 읽기 에러 ({path}): {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON 문법 에러
    #[error("JSON 파싱 에러 ({path}): {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// 구조가 기대와 다른 데이터
    #[error("잘못된 데이터: {0}")]
    InvalidData(String),

    /// 길이 제한을 넘는 문자열 필드
    #[error("필드 길이 초과: {field} (최대 {max}자, 입력 {actual}자)")]
    FieldTooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
}

/// ETF 작업을 위한 Result 타입.
pub type Result<T> = std::result::Result<T, EtfError>;

impl EtfError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn json(path: &Path, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.to_path_buf(),
            source,
        }
    }

    /// 파일 시스템 단계에서 실패했는지 확인합니다.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// 문서 내용 때문에 실패했는지 확인합니다.
    pub fn is_parse(&self) -> bool {
        matches!(
            self,
            Self::Json { .. } | Self::InvalidData(_) | Self::FieldTooLong { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let io = EtfError::io(
            Path::new("missing.json"),
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert!(io.is_io());
        assert!(!io.is_parse());

        let too_long = EtfError::FieldTooLong {
            field: "ticker",
            max: 10,
            actual: 12,
        };
        assert!(too_long.is_parse());
        assert!(too_long.to_string().contains("ticker"));
    }
}

//! 기본 정보 파서.
//!
//! 모든 수집 스크립트는 출력에 `Ticker`, `Nom`, `Secteur`, `Domaine`, `Timestamp`를 기록하고,
//! 수집에 실패하면 `ErrorCode`(0이 아님)와 `ErrorMessage`를 함께 기록합니다.

use std::path::Path;

use serde_json::Value;

use super::load_document;
use crate::error::Result;
use crate::record::{EtfIdentity, EtfRecord};
use crate::types::{Label, Ticker};

/// 수집 스크립트가 보고한 결과 상태.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceStatus {
    /// 정상 수집
    Ok,
    /// 스크립트가 에러 페이로드를 기록함
    Failed { code: i64, message: String },
}

impl SourceStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    /// 0이 아닌 `ErrorCode`가 있으면 `Failed`.
    fn from_document(document: &Value) -> Self {
        match document.get("ErrorCode").and_then(Value::as_i64) {
            Some(code) if code != 0 => Self::Failed {
                code,
                message: document
                    .get("ErrorMessage")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            },
            _ => Self::Ok,
        }
    }
}

/// 출력 파일의 수집 상태만 읽습니다. 레코드는 건드리지 않습니다.
pub fn read_source_status(path: impl AsRef<Path>) -> Result<SourceStatus> {
    load_document(path.as_ref()).map(|document| SourceStatus::from_document(&document))
}

/// 기본 정보를 레코드에 반영하고 수집 상태를 반환합니다.
///
/// 존재하는 필드만 덮어씁니다. 길이 제한을 넘는 문자열이 있으면 실패하며
/// 기본 정보는 변경되지 않습니다. 에러 페이로드도 기본 정보는 담고 있으므로 반영합니다.
pub fn parse_identity_json(path: impl AsRef<Path>, record: &mut EtfRecord) -> Result<SourceStatus> {
    let path = path.as_ref();
    let document = load_document(path)?;

    let mut identity: EtfIdentity = record.identity.clone();
    if let Some(ticker) = document.get("Ticker").and_then(Value::as_str) {
        identity.ticker = Ticker::new("ticker", ticker)?;
    }
    if let Some(name) = document.get("Nom").and_then(Value::as_str) {
        identity.name = Label::new("name", name)?;
    }
    if let Some(sector) = document.get("Secteur").and_then(Value::as_str) {
        identity.sector = Label::new("sector", sector)?;
    }
    if let Some(domain) = document.get("Domaine").and_then(Value::as_str) {
        identity.domain = Label::new("domain", domain)?;
    }
    if let Some(timestamp) = document.get("Timestamp").and_then(Value::as_i64) {
        identity.timestamp = timestamp;
    }
    record.identity = identity;

    let status = SourceStatus::from_document(&document);

    if let SourceStatus::Failed { code, message } = &status {
        tracing::warn!(
            path = %path.display(),
            ticker = %record.identity.ticker,
            code,
            message = %message,
            "수집 스크립트가 에러를 기록함"
        );
    }
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EtfError;
    use crate::parsers::test_support::json_file;

    #[test]
    fn test_reads_identity_fields() {
        let file = json_file(
            r#"{"Ticker": "XLE", "Nom": "Energy Select Sector SPDR", "Secteur": "Energie",
                "Domaine": "Petrole", "Timestamp": 1717000000, "Close": 91.2, "ErrorCode": 0}"#,
        );
        let mut record = EtfRecord::new();

        let status = parse_identity_json(file.path(), &mut record).unwrap();

        assert!(status.is_ok());
        assert_eq!(record.identity.ticker, "XLE");
        assert_eq!(record.identity.sector, "Energie");
        assert_eq!(record.identity.domain, "Petrole");
        assert_eq!(record.identity.timestamp, 1_717_000_000);
        assert_eq!(record.technical_indicators, Default::default());
    }

    #[test]
    fn test_error_payload_is_reported() {
        let file = json_file(
            r#"{"Ticker": "XLE", "Timestamp": 1717000000, "ErrorCode": 1,
                "ErrorMessage": "fetch failed after 3 attempts"}"#,
        );
        let mut record = EtfRecord::new();

        let status = parse_identity_json(file.path(), &mut record).unwrap();

        assert_eq!(
            status,
            SourceStatus::Failed {
                code: 1,
                message: "fetch failed after 3 attempts".to_string()
            }
        );
        assert_eq!(record.identity.ticker, "XLE");
    }

    #[test]
    fn test_read_source_status_only() {
        let failed = json_file(r#"{"Ticker": "XLE", "ErrorCode": 1, "ErrorMessage": "fetch failed"}"#);
        let ok = json_file(r#"{"Ticker": "XLE", "BalanceSheet": []}"#);

        assert_eq!(
            read_source_status(failed.path()).unwrap(),
            SourceStatus::Failed {
                code: 1,
                message: "fetch failed".to_string()
            }
        );
        assert!(read_source_status(ok.path()).unwrap().is_ok());
        assert!(read_source_status(ok.path().with_extension("missing")).unwrap_err().is_io());
    }

    #[test]
    fn test_oversized_ticker_leaves_identity_unchanged() {
        let file = json_file(r#"{"Ticker": "WAY-TOO-LONG-TICKER", "Nom": "Fund"}"#);
        let mut record = EtfRecord::new();
        record.identity.name = Label::new("name", "Existing").unwrap();

        let err = parse_identity_json(file.path(), &mut record).unwrap_err();

        assert!(matches!(err, EtfError::FieldTooLong { field: "ticker", .. }));
        assert_eq!(record.identity.name, "Existing");
        assert!(record.identity.ticker.is_empty());
    }
}

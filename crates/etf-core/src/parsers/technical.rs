//! 기술 데이터 스크립트 출력 파서.
//!
//! 기술 데이터 스크립트는 지표 키를 문서 최상위에 평탄하게 기록합니다:
//! `{"SMA_20": .., "RSI_14": .., "Ticker": "SPY", "Timestamp": ..}`

use std::path::Path;

use super::load_document;
use crate::error::Result;
use crate::record::EtfRecord;

/// 최상위 지표 키를 레코드의 기술적 지표에 병합합니다.
///
/// 병합 규칙은 `parse_indicator_json`과 같습니다.
pub fn parse_technical_json(path: impl AsRef<Path>, record: &mut EtfRecord) -> Result<()> {
    let path = path.as_ref();
    let document = load_document(path)?;

    let applied = document
        .as_object()
        .map(|top| record.technical_indicators.merge_from(top))
        .unwrap_or(0);

    tracing::debug!(path = %path.display(), applied, "기술 데이터 병합");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::test_support::json_file;

    #[test]
    fn test_flat_layout() {
        let file = json_file(
            r#"{"SMA_20": 480.1, "SMA_50": 470.2, "EMA_20": 479.0, "EMA_50": 468.9,
                "RSI_14": 61.3, "MACD": 2.1, "MACD_Signal": 1.7, "MACD_Hist": 0.4,
                "Ticker": "SPY", "Timestamp": 1700000000}"#,
        );
        let mut record = EtfRecord::new();

        parse_technical_json(file.path(), &mut record).unwrap();

        let ti = record.technical_indicators;
        assert_eq!(ti.sma_20, 480.1);
        assert_eq!(ti.ema_50, 468.9);
        assert_eq!(ti.macd_hist, 0.4);
        assert!(record.identity.is_empty());
    }

    #[test]
    fn test_nested_section_is_not_read() {
        let file = json_file(r#"{"TechnicalIndicators": {"SMA_20": 1.0}}"#);
        let mut record = EtfRecord::new();

        parse_technical_json(file.path(), &mut record).unwrap();

        assert_eq!(record.technical_indicators.sma_20, 0.0);
    }

    #[test]
    fn test_error_payload_keeps_prior_values() {
        let file = json_file(
            r#"{"Ticker": "SPY", "ErrorCode": 1, "ErrorMessage": "fetch failed"}"#,
        );
        let mut record = EtfRecord::new();
        record.technical_indicators.rsi_14 = 48.0;

        parse_technical_json(file.path(), &mut record).unwrap();

        assert_eq!(record.technical_indicators.rsi_14, 48.0);
    }
}

//! `TechnicalIndicators` 객체 파서.

use std::path::Path;

use serde_json::Value;

use super::load_document;
use crate::error::Result;
use crate::record::EtfRecord;

/// 파일의 `TechnicalIndicators` 객체에서 지표 8종을 읽어 레코드에 병합합니다.
///
/// - 파일을 열거나 읽을 수 없거나 JSON이 아니면 실패하며 지표는 그대로입니다.
/// - 숫자인 필드만 복사하고, 없거나 숫자가 아닌 필드는 이전 값을 유지합니다.
/// - `TechnicalIndicators` 객체가 없는 유효한 JSON(`{}` 등)은 변경 없이 성공입니다.
/// - 값의 범위는 검사하지 않습니다.
pub fn parse_indicator_json(path: impl AsRef<Path>, record: &mut EtfRecord) -> Result<()> {
    let path = path.as_ref();
    let document = load_document(path)?;

    let applied = match document.get("TechnicalIndicators").and_then(Value::as_object) {
        Some(section) => record.technical_indicators.merge_from(section),
        None => 0,
    };

    tracing::debug!(path = %path.display(), applied, "기술적 지표 병합");
    Ok(())
}

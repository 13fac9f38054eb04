//! 수집 스크립트가 생성한 JSON 파일 파서.
//!
//! 모든 파서는 같은 형태를 따릅니다:
//! 파일 경로와 레코드를 받아 파일 전체를 읽고, JSON으로 파싱한 뒤,
//! 자신이 담당하는 구역만 수정합니다. 실패 시 해당 구역은 호출 전 상태 그대로입니다.

mod additional;
mod financials;
mod identity;
mod indicators;
mod technical;

pub use additional::parse_additional_json;
pub use financials::parse_financials_json;
pub use identity::{parse_identity_json, read_source_status, SourceStatus};
pub use indicators::parse_indicator_json;
pub use technical::parse_technical_json;

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{EtfError, Result};
use crate::record::number_value;

/// 파일 전체를 읽어 JSON 문서로 파싱합니다.
///
/// 파일 열기/읽기 실패, UTF-8이 아닌 내용은 `EtfError::Io`,
/// 문법 오류(빈 파일 포함)는 `EtfError::Json`입니다.
pub(crate) fn load_document(path: &Path) -> Result<Value> {
    let contents = fs::read_to_string(path).map_err(|e| EtfError::io(path, e))?;
    tracing::debug!(path = %path.display(), bytes = contents.len(), "JSON 파일 읽기 완료");
    serde_json::from_str(&contents).map_err(|e| EtfError::json(path, e))
}

/// 최상위 객체에서 `key`에 해당하는 배열을 찾습니다. 없거나 배열이 아니면 `None`.
pub(crate) fn section_array<'a>(document: &'a Value, key: &str) -> Option<&'a Vec<Value>> {
    document.get(key).and_then(Value::as_array)
}

/// 숫자 필드. 없거나 숫자가 아니면 0.
pub(crate) fn number_or_zero(entry: &Map<String, Value>, key: &str) -> f64 {
    entry.get(key).and_then(number_value).unwrap_or_default()
}

/// 문자열 필드. `keys` 중 처음 존재하는 문자열 값, 없으면 빈 문자열.
pub(crate) fn str_or_empty<'a>(entry: &'a Map<String, Value>, keys: &[&str]) -> &'a str {
    keys.iter()
        .find_map(|key| entry.get(*key).and_then(Value::as_str))
        .unwrap_or_default()
}

/// 배열 원소를 객체로 보고, 필수 `Date` 문자열을 꺼냅니다.
pub(crate) fn dated_entry<'a>(
    section: &str,
    index: usize,
    value: &'a Value,
) -> Result<(&'a Map<String, Value>, String)> {
    let entry = value.as_object().ok_or_else(|| {
        EtfError::InvalidData(format!("{section}[{index}]: 객체가 아닙니다"))
    })?;
    let date = entry.get("Date").and_then(Value::as_str).ok_or_else(|| {
        EtfError::InvalidData(format!("{section}[{index}]: Date 문자열이 없습니다"))
    })?;
    Ok((entry, date.to_string()))
}

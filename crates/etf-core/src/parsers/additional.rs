//! 투자의견/일정 파서.
//!
//! 부가 데이터 스크립트 출력 형식:
//!
//! ```json
//! {
//!   "Recommendations": [
//!     {"Date": "2024-05-01", "Firm": "Morgan Stanley", "ToGrade": "Overweight",
//!      "FromGrade": "Equal-Weight", "Action": "up"}
//!   ],
//!   "Calendar": {"Earnings Date": ["2024-07-25", "2024-07-29"]}
//! }
//! ```
//!
//! 투자의견 표를 그대로 덤프한 출력은 등급 열 이름에 공백이 있습니다
//! (`"To Grade"`, `"From Grade"`). 두 표기 모두 읽습니다.

use std::path::Path;

use serde_json::{Map, Value};

use super::{dated_entry, load_document, section_array, str_or_empty};
use crate::error::{EtfError, Result};
use crate::record::{CalendarEvent, EtfRecord, Recommendation};
use crate::types::{Grade, Label};

/// 투자의견을 레코드 뒤에 추가하고 일정 이벤트를 교체합니다.
///
/// 둘 다 읽은 뒤에 함께 반영합니다. 실패하면 두 구역 모두 변경되지 않습니다.
pub fn parse_additional_json(path: impl AsRef<Path>, record: &mut EtfRecord) -> Result<()> {
    let path = path.as_ref();
    let document = load_document(path)?;

    let recommendations = read_recommendations(&document)?;
    let calendar = match document.get("Calendar").and_then(Value::as_object) {
        Some(object) => read_calendar(object)?,
        None => None,
    };

    tracing::debug!(
        path = %path.display(),
        recommendations = recommendations.len(),
        calendar_key = calendar.as_ref().and_then(|c| c.key.as_deref()),
        "부가 데이터 파싱 완료"
    );

    record.recommendations.extend(recommendations);
    if let Some(calendar) = calendar {
        record.calendar = calendar;
    }
    Ok(())
}

fn read_recommendations(document: &Value) -> Result<Vec<Recommendation>> {
    let Some(rows) = section_array(document, "Recommendations") else {
        return Ok(Vec::new());
    };
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let (entry, date) = dated_entry("Recommendations", i, row)?;
            Ok(Recommendation {
                date,
                firm: Label::new("firm", str_or_empty(entry, &["Firm"]))?,
                to_grade: Grade::new("to_grade", str_or_empty(entry, &["ToGrade", "To Grade"]))?,
                from_grade: Grade::new("from_grade", str_or_empty(entry, &["FromGrade", "From Grade"]))?,
                action: Grade::new("action", str_or_empty(entry, &["Action"]))?,
            })
        })
        .collect()
}

/// 원본 순서상 첫 번째로 사용 가능한 키를 일정 이벤트로 읽습니다.
///
/// 값이 문자열이면 한 개짜리 목록, 배열이면 문자열/숫자 원소 목록입니다.
/// 사용 가능한 키가 없으면 `None`.
fn read_calendar(object: &Map<String, Value>) -> Result<Option<CalendarEvent>> {
    for (key, value) in object {
        let values = match value {
            Value::String(s) => vec![s.clone()],
            Value::Array(items) => items
                .iter()
                .map(|item| calendar_value(key, item))
                .collect::<Result<Vec<_>>>()?,
            _ => continue,
        };
        return Ok(Some(CalendarEvent {
            key: Some(key.clone()),
            values,
        }));
    }
    Ok(None)
}

fn calendar_value(key: &str, item: &Value) -> Result<String> {
    match item {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(EtfError::InvalidData(format!(
            "Calendar.{key}: 지원하지 않는 값 {other}"
        ))),
    }
}

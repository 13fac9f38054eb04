//! 투자의견 및 일정 데이터.

use serde::Serialize;

use crate::types::{Grade, Label};

/// 애널리스트 투자의견 변경 한 건.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub date: String,
    /// 증권사/리서치 기관
    pub firm: Label,
    /// 변경 후 등급
    pub to_grade: Grade,
    /// 변경 전 등급
    pub from_grade: Grade,
    /// 액션 (up, down, main, init, reit 등)
    pub action: Grade,
}

/// 키 하나와 그에 딸린 값 목록 (예: "Earnings Date" → 예정일 목록).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CalendarEvent {
    pub key: Option<String>,
    pub values: Vec<String>,
}

impl CalendarEvent {
    pub fn is_empty(&self) -> bool {
        self.key.is_none() && self.values.is_empty()
    }
}

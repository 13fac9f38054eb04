//! ETF 기본 정보.

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

use crate::types::{Label, Ticker};

/// 티커, 이름, 분류, 수집 시각.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EtfIdentity {
    /// 티커 심볼
    pub ticker: Ticker,
    /// 표시 이름
    pub name: Label,
    /// 섹터
    pub sector: Label,
    /// 도메인 (섹터 하위 분류)
    pub domain: Label,
    /// 수집 시각 (Unix 초, 0 = 미설정)
    pub timestamp: i64,
}

impl EtfIdentity {
    pub fn is_empty(&self) -> bool {
        self.ticker.is_empty()
            && self.name.is_empty()
            && self.sector.is_empty()
            && self.domain.is_empty()
            && self.timestamp == 0
    }

    /// 수집 시각을 UTC 시각으로 반환합니다. 미설정이면 `None`.
    pub fn captured_at(&self) -> Option<DateTime<Utc>> {
        if self.timestamp == 0 {
            return None;
        }
        Utc.timestamp_opt(self.timestamp, 0).single()
    }
}

//! ETF 한 종목의 데이터 레코드.
//!
//! `EtfRecord`는 한 티커에 대한 모든 데이터를 소유하는 집합 루트입니다.
//! 각 파서는 레코드의 서로 겹치지 않는 구역만 수정합니다:
//! - 기본 정보 (`identity`)
//! - 기술적 지표 (`technical_indicators`)
//! - 재무제표 (`balance_sheets`, `income_statements`, `cash_flows`)
//! - 투자의견 및 일정 (`recommendations`, `calendar`)

mod additional;
mod identity;
mod indicators;
mod statements;

pub use additional::*;
pub use identity::*;
pub use indicators::*;
pub use statements::*;

use serde::Serialize;

/// 한 ETF의 전체 데이터.
///
/// 일부 구역만 채워진 상태도 유효한 중간 상태입니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EtfRecord {
    /// 기본 정보
    pub identity: EtfIdentity,
    /// 기술적 지표
    pub technical_indicators: TechnicalIndicators,
    /// 대차대조표 (원본 파일 순서)
    pub balance_sheets: Vec<BalanceSheet>,
    /// 손익계산서 (원본 파일 순서)
    pub income_statements: Vec<IncomeStatement>,
    /// 현금흐름표 (원본 파일 순서)
    pub cash_flows: Vec<CashFlow>,
    /// 애널리스트 투자의견
    pub recommendations: Vec<Recommendation>,
    /// 일정 이벤트 (키 하나만 표현)
    pub calendar: CalendarEvent,
}

impl EtfRecord {
    /// 빈 레코드를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 초기화 상태(모든 문자열 비어있음, 수치 0, 시퀀스 비어있음)인지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.identity.is_empty()
            && self.technical_indicators == TechnicalIndicators::default()
            && self.balance_sheets.is_empty()
            && self.income_statements.is_empty()
            && self.cash_flows.is_empty()
            && self.recommendations.is_empty()
            && self.calendar.is_empty()
    }

    /// 레코드와 소유한 모든 문자열/시퀀스를 해제합니다.
    ///
    /// 값을 소비하므로 두 번 호출할 수 없습니다.
    pub fn release(self) {
        drop(self);
    }
}

/// 빈 레코드를 생성합니다. `EtfRecord::new()`와 동일합니다.
pub fn initialize() -> EtfRecord {
    EtfRecord::new()
}

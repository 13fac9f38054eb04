//! 재무제표 스냅샷 (보고일 단위).

use serde::Serialize;

/// 대차대조표 한 시점
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BalanceSheet {
    pub date: String,
    pub total_assets: f64,
    pub total_liabilities: f64,
    pub equity: f64,
}

/// 손익계산서 한 시점
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IncomeStatement {
    pub date: String,
    pub revenue: f64,
    pub net_income: f64,
}

/// 현금흐름표 한 시점
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CashFlow {
    pub date: String,
    pub operating_cash_flow: f64,
    pub investing_cash_flow: f64,
    pub financing_cash_flow: f64,
}

//! 재무제표 파서.
//!
//! 세 배열(`BalanceSheet`, `IncomeStatement`, `CashFlow`)을 보고일 단위 스냅샷으로 읽습니다.
//! 배열마다 두 가지 형태를 받습니다.
//!
//! 보고일 한 건당 객체 하나:
//!
//! ```json
//! {"BalanceSheet": [{"Date": "2024-06-30", "TotalAssets": 1.0, "TotalLiabilities": 0.4, "Equity": 0.6}]}
//! ```
//!
//! 재무 스크립트가 쓰는 항목 한 줄당 객체 하나 (`index` = 항목명, 나머지 키 = 보고일):
//!
//! ```json
//! {"BalanceSheet": [
//!   {"index": "Total Assets", "2024-06-30 00:00:00": 1.0, "2023-06-30 00:00:00": 0.9},
//!   {"index": "Stockholders Equity", "2024-06-30 00:00:00": 0.6, "2023-06-30 00:00:00": 0.5}
//! ]}
//! ```

use std::path::Path;

use serde_json::{Map, Value};

use super::{dated_entry, load_document, number_or_zero, section_array};
use crate::error::{EtfError, Result};
use crate::record::{number_value, BalanceSheet, CashFlow, EtfRecord, IncomeStatement};

// 항목명 후보 (앞쪽 우선). 키 이름은 조회 시점에 따라 바뀌어 왔습니다.
const TOTAL_ASSETS: &[&str] = &["Total Assets"];
const TOTAL_LIABILITIES: &[&str] = &["Total Liabilities Net Minority Interest", "Total Liab"];
const EQUITY: &[&str] = &[
    "Stockholders Equity",
    "Total Stockholder Equity",
    "Common Stock Equity",
];
const REVENUE: &[&str] = &["Total Revenue", "Operating Revenue"];
const NET_INCOME: &[&str] = &["Net Income", "Net Income Common Stockholders"];
const OPERATING_CASH_FLOW: &[&str] = &[
    "Operating Cash Flow",
    "Total Cash From Operating Activities",
];
const INVESTING_CASH_FLOW: &[&str] = &[
    "Investing Cash Flow",
    "Total Cashflows From Investing Activities",
];
const FINANCING_CASH_FLOW: &[&str] = &[
    "Financing Cash Flow",
    "Total Cash From Financing Activities",
];

/// 대차대조표/손익계산서/현금흐름표를 레코드 시퀀스 뒤에 추가합니다.
///
/// 세 배열을 모두 읽은 뒤에만 반영합니다. 원소 하나라도 잘못되면
/// (객체가 아니거나 `Date`/`index` 문자열이 없음) 세 시퀀스 모두 변경되지 않습니다.
/// 배열이 없는 구역은 건너뜁니다.
pub fn parse_financials_json(path: impl AsRef<Path>, record: &mut EtfRecord) -> Result<()> {
    let path = path.as_ref();
    let document = load_document(path)?;

    let balance_sheets =
        read_section(&document, "BalanceSheet", balance_sheet_row, |items, column, date| {
            BalanceSheet {
                date,
                total_assets: items.value(TOTAL_ASSETS, column),
                total_liabilities: items.value(TOTAL_LIABILITIES, column),
                equity: items.value(EQUITY, column),
            }
        })?;
    let income_statements =
        read_section(&document, "IncomeStatement", income_statement_row, |items, column, date| {
            IncomeStatement {
                date,
                revenue: items.value(REVENUE, column),
                net_income: items.value(NET_INCOME, column),
            }
        })?;
    let cash_flows =
        read_section(&document, "CashFlow", cash_flow_row, |items, column, date| CashFlow {
            date,
            operating_cash_flow: items.value(OPERATING_CASH_FLOW, column),
            investing_cash_flow: items.value(INVESTING_CASH_FLOW, column),
            financing_cash_flow: items.value(FINANCING_CASH_FLOW, column),
        })?;

    tracing::debug!(
        path = %path.display(),
        balance_sheets = balance_sheets.len(),
        income_statements = income_statements.len(),
        cash_flows = cash_flows.len(),
        "재무제표 파싱 완료"
    );

    record.balance_sheets.extend(balance_sheets);
    record.income_statements.extend(income_statements);
    record.cash_flows.extend(cash_flows);
    Ok(())
}

/// 배열 형태를 판별해 스냅샷 목록으로 읽습니다.
fn read_section<T>(
    document: &Value,
    section: &str,
    from_row: impl Fn(&Map<String, Value>, String) -> T,
    from_items: impl Fn(&LineItems<'_>, &str, String) -> T,
) -> Result<Vec<T>> {
    let Some(rows) = section_array(document, section) else {
        return Ok(Vec::new());
    };

    if is_line_item_layout(rows) {
        let items = LineItems::from_rows(section, rows)?;
        return Ok(items
            .dates
            .iter()
            .map(|column| from_items(&items, column, report_date(column)))
            .collect());
    }

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let (entry, date) = dated_entry(section, i, row)?;
            Ok(from_row(entry, date))
        })
        .collect()
}

fn balance_sheet_row(entry: &Map<String, Value>, date: String) -> BalanceSheet {
    BalanceSheet {
        date,
        total_assets: number_or_zero(entry, "TotalAssets"),
        total_liabilities: number_or_zero(entry, "TotalLiabilities"),
        equity: number_or_zero(entry, "Equity"),
    }
}

fn income_statement_row(entry: &Map<String, Value>, date: String) -> IncomeStatement {
    IncomeStatement {
        date,
        revenue: number_or_zero(entry, "Revenue"),
        net_income: number_or_zero(entry, "NetIncome"),
    }
}

fn cash_flow_row(entry: &Map<String, Value>, date: String) -> CashFlow {
    CashFlow {
        date,
        operating_cash_flow: number_or_zero(entry, "OperatingCashFlow"),
        investing_cash_flow: number_or_zero(entry, "InvestingCashFlow"),
        financing_cash_flow: number_or_zero(entry, "FinancingCashFlow"),
    }
}

/// 첫 원소가 `Date` 없이 `index`를 가지면 항목 행 형태입니다.
fn is_line_item_layout(rows: &[Value]) -> bool {
    rows.first()
        .and_then(Value::as_object)
        .is_some_and(|row| row.contains_key("index") && !row.contains_key("Date"))
}

/// 보고일 열 이름에서 시각 부분을 버립니다 ("2024-06-30 00:00:00" → "2024-06-30").
fn report_date(column: &str) -> String {
    column
        .split_once(' ')
        .map_or(column, |(day, _)| day)
        .to_string()
}

/// 항목(행) × 보고일(열) 표.
struct LineItems<'a> {
    rows: Vec<(&'a str, &'a Map<String, Value>)>,
    /// 보고일 열 (처음 나온 순서)
    dates: Vec<&'a str>,
}

impl<'a> LineItems<'a> {
    fn from_rows(section: &str, rows: &'a [Value]) -> Result<Self> {
        let mut items = Self {
            rows: Vec::with_capacity(rows.len()),
            dates: Vec::new(),
        };
        for (i, row) in rows.iter().enumerate() {
            let entry = row.as_object().ok_or_else(|| {
                EtfError::InvalidData(format!("{section}[{i}]: 객체가 아닙니다"))
            })?;
            let label = entry.get("index").and_then(Value::as_str).ok_or_else(|| {
                EtfError::InvalidData(format!("{section}[{i}]: index 문자열이 없습니다"))
            })?;
            for column in entry.keys().filter(|k| k.as_str() != "index") {
                if !items.dates.contains(&column.as_str()) {
                    items.dates.push(column);
                }
            }
            items.rows.push((label, entry));
        }
        Ok(items)
    }

    /// 후보 항목명 중 처음 존재하는 행의 해당 보고일 값. 없거나 숫자가 아니면 0.
    fn value(&self, labels: &[&str], date: &str) -> f64 {
        labels
            .iter()
            .find_map(|label| self.rows.iter().find(|(l, _)| l == label))
            .and_then(|(_, row)| row.get(date))
            .and_then(number_value)
            .unwrap_or_default()
    }
}

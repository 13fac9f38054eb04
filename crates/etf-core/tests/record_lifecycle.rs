//! 레코드 생명주기 통합 테스트
//!
//! 초기화 → 여러 파서로 부분/전체 채우기 → 해제 흐름을 검증합니다.

use std::fs;
use std::path::PathBuf;

use etf_core::{
    initialize, parse_additional_json, parse_financials_json, parse_identity_json,
    parse_indicator_json, parse_technical_json, EtfRecord,
};
use tempfile::TempDir;

/// 한 종목의 스크립트 출력 파일들
struct Fixture {
    _dir: TempDir,
    individual: PathBuf,
    technical: PathBuf,
    financials: PathBuf,
    additional: PathBuf,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().expect("tempdir");
    let individual = dir.path().join("individual.json");
    let technical = dir.path().join("technical.json");
    let financials = dir.path().join("financials.json");
    let additional = dir.path().join("additional.json");

    fs::write(
        &individual,
        r#"{"Ticker": "QQQ", "Nom": "Invesco QQQ Trust", "Secteur": "Technologie",
            "Domaine": "Large caps", "Timestamp": 1718000000, "ErrorCode": 0,
            "TechnicalIndicators": {"SMA_20": 101.5, "RSI_14": 55}}"#,
    )
    .unwrap();
    fs::write(
        &technical,
        r#"{"SMA_50": 98.25, "EMA_20": 100.75, "MACD": 1.5, "MACD_Signal": "NaN", "Ticker": "QQQ"}"#,
    )
    .unwrap();
    fs::write(
        &financials,
        r#"{"BalanceSheet": [{"Date": "2024-03-31", "TotalAssets": 10.0, "TotalLiabilities": 4.0, "Equity": 6.0}],
            "IncomeStatement": [{"Date": "2024-03-31", "Revenue": 3.0, "NetIncome": 1.0},
                                {"Date": "2023-03-31", "Revenue": 2.5, "NetIncome": 0.8}],
            "CashFlow": []}"#,
    )
    .unwrap();
    fs::write(
        &additional,
        r#"{"Recommendations": [{"Date": "2024-04-02", "Firm": "Jefferies", "ToGrade": "Buy",
                                 "FromGrade": "Hold", "Action": "up"}],
            "Calendar": {"Earnings Date": ["2024-07-18"]}}"#,
    )
    .unwrap();

    Fixture {
        _dir: dir,
        individual,
        technical,
        financials,
        additional,
    }
}

#[test]
fn test_initialize_then_release() {
    let record = initialize();
    assert!(record.is_empty());
    assert_eq!(record, EtfRecord::default());
    record.release();
}

#[test]
fn test_full_population_then_release() {
    let f = fixture();
    let mut record = EtfRecord::new();

    assert!(parse_identity_json(&f.individual, &mut record).unwrap().is_ok());
    parse_indicator_json(&f.individual, &mut record).unwrap();
    parse_technical_json(&f.technical, &mut record).unwrap();
    parse_financials_json(&f.financials, &mut record).unwrap();
    parse_additional_json(&f.additional, &mut record).unwrap();

    assert_eq!(record.identity.ticker, "QQQ");
    assert_eq!(record.identity.name, "Invesco QQQ Trust");
    let ti = record.technical_indicators;
    assert_eq!(ti.sma_20, 101.5);
    assert_eq!(ti.sma_50, 98.25);
    assert_eq!(ti.rsi_14, 55.0);
    assert_eq!(ti.macd, 1.5);
    assert_eq!(ti.macd_signal, 0.0);
    assert_eq!(record.balance_sheets.len(), 1);
    assert_eq!(record.income_statements.len(), 2);
    assert_eq!(record.income_statements[1].date, "2023-03-31");
    assert!(record.cash_flows.is_empty());
    assert_eq!(record.recommendations[0].firm, "Jefferies");
    assert_eq!(record.calendar.values, vec!["2024-07-18"]);

    record.release();
}

#[test]
fn test_partial_population_is_valid() {
    let f = fixture();
    let mut record = EtfRecord::new();

    parse_indicator_json(&f.individual, &mut record).unwrap();
    assert!(parse_financials_json(f.financials.with_extension("missing"), &mut record).is_err());

    assert_eq!(record.technical_indicators.sma_20, 101.5);
    assert!(record.balance_sheets.is_empty());
    assert!(record.identity.is_empty());
    record.release();
}

#[test]
fn test_each_parser_touches_only_its_section() {
    let f = fixture();

    let mut record = EtfRecord::new();
    parse_financials_json(&f.financials, &mut record).unwrap();
    assert!(record.identity.is_empty());
    assert_eq!(record.technical_indicators, Default::default());
    assert!(record.recommendations.is_empty());
    assert!(record.calendar.is_empty());

    let mut record = EtfRecord::new();
    parse_additional_json(&f.additional, &mut record).unwrap();
    assert!(record.balance_sheets.is_empty());
    assert!(record.income_statements.is_empty());
    assert_eq!(record.technical_indicators, Default::default());
}

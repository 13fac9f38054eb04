//! 스크립트 출력 적재 모듈.
//!
//! 종목별로 네 개의 출력 파일을 읽어 `EtfRecord` 하나를 만듭니다.
//! 파일이 없으면 건너뛰고, 파싱 실패는 경고 로그를 남긴 뒤 다음 파일로 진행합니다.

use std::path::Path;
use std::time::Instant;

use etf_core::{
    load_etf_list, parse_additional_json, parse_financials_json, parse_identity_json,
    parse_indicator_json, parse_technical_json, read_source_status, EtfListing, EtfRecord,
    SourceStatus,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::{split_list, CollectorConfig, DataLayout};
use crate::{CollectionStats, Result};

/// 적재 대상 종목
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestTarget {
    pub ticker: String,
    /// 유니버스에 있는 경우 목록 정보
    pub listing: Option<EtfListing>,
}

/// 한 종목의 출력 파일들로 레코드를 만듭니다.
///
/// 파일 하나가 통계의 대상 하나입니다. 기본 정보와 지표가 함께 담긴 시세 파일도 하나로 셉니다.
pub fn ingest_ticker(
    layout: &DataLayout,
    listing: Option<&EtfListing>,
    ticker: &str,
) -> (EtfRecord, CollectionStats) {
    let start = Instant::now();
    let mut record = EtfRecord::new();
    let mut stats = CollectionStats::new();

    if let Some(listing) = listing {
        if let Err(e) = listing.seed_identity(&mut record) {
            warn!(ticker, error = %e, "목록 정보 반영 실패");
        }
    }

    let individual = layout.individual(ticker);
    apply(&mut stats, ticker, "individual", &individual, |path| {
        let status = parse_identity_json(path, &mut record)?;
        parse_indicator_json(path, &mut record)?;
        Ok(status)
    });

    let technical = layout.technical(ticker);
    apply(&mut stats, ticker, "technical", &technical, |path| {
        parse_reported(path, |path| parse_technical_json(path, &mut record))
    });

    let financials = layout.financials(ticker);
    apply(&mut stats, ticker, "financials", &financials, |path| {
        parse_reported(path, |path| parse_financials_json(path, &mut record))
    });

    let additional = layout.additional(ticker);
    apply(&mut stats, ticker, "additional", &additional, |path| {
        parse_reported(path, |path| parse_additional_json(path, &mut record))
    });

    stats.elapsed = start.elapsed();
    debug!(
        ticker,
        success = stats.success,
        errors = stats.errors,
        skipped = stats.skipped,
        "종목 적재 완료"
    );
    (record, stats)
}

/// 스크립트가 에러 페이로드를 기록했으면 파싱하지 않고 그 상태를 반환합니다.
fn parse_reported<F>(path: &Path, parse: F) -> etf_core::Result<SourceStatus>
where
    F: FnOnce(&Path) -> etf_core::Result<()>,
{
    let status = read_source_status(path)?;
    if status.is_ok() {
        parse(path)?;
    }
    Ok(status)
}

fn apply<F>(stats: &mut CollectionStats, ticker: &str, source: &str, path: &Path, parse: F)
where
    F: FnOnce(&Path) -> etf_core::Result<SourceStatus>,
{
    stats.total += 1;

    if !path.exists() {
        debug!(ticker, source, path = %path.display(), "출력 파일 없음, 건너뜀");
        stats.skipped += 1;
        return;
    }

    match parse(path) {
        Ok(SourceStatus::Ok) => stats.success += 1,
        Ok(SourceStatus::Failed { code, message }) => {
            warn!(ticker, source, code, message = %message, "스크립트가 수집 실패를 기록함");
            stats.errors += 1;
        }
        Err(e) => {
            warn!(ticker, source, path = %path.display(), error = %e, "파싱 실패");
            stats.errors += 1;
        }
    }
}

/// 적재할 종목을 정합니다.
///
/// `tickers`가 없으면 유니버스 전체를 파일 순서대로, 있으면 지정한 순서대로 반환합니다.
/// 유니버스에 없는 종목도 목록 정보 없이 포함합니다.
pub fn select_targets(listings: Vec<EtfListing>, tickers: Option<&str>) -> Vec<IngestTarget> {
    let Some(tickers) = tickers else {
        return listings
            .into_iter()
            .map(|listing| IngestTarget {
                ticker: listing.ticker.clone(),
                listing: Some(listing),
            })
            .collect();
    };

    split_list(tickers)
        .into_iter()
        .map(|ticker| {
            let listing = listings.iter().find(|l| l.ticker == ticker).cloned();
            if listing.is_none() {
                debug!(ticker = %ticker, "유니버스에 없는 종목");
            }
            IngestTarget { ticker, listing }
        })
        .collect()
}

/// 지정한 종목들(없으면 유니버스 전체)을 적재합니다.
///
/// 종목을 지정했다면 유니버스 파일을 읽지 못해도 목록 정보 없이 진행합니다.
/// 토큰이 취소되면 남은 종목은 적재하지 않고 그때까지의 레코드를 반환합니다.
pub fn ingest_all(
    config: &CollectorConfig,
    tickers: Option<&str>,
    shutdown: &CancellationToken,
) -> Result<(Vec<EtfRecord>, CollectionStats)> {
    let start = Instant::now();

    let listings = match load_etf_list(&config.etf_list_file) {
        Ok(listings) => listings,
        Err(e) if tickers.is_some() => {
            warn!(error = %e, "ETF 목록을 읽지 못해 목록 정보 없이 진행합니다");
            Vec::new()
        }
        Err(e) => return Err(e.into()),
    };

    let targets = select_targets(listings, tickers);
    info!(count = targets.len(), "적재 시작");

    let mut records = Vec::with_capacity(targets.len());
    let mut stats = CollectionStats::new();
    for target in &targets {
        if shutdown.is_cancelled() {
            warn!(
                ingested = records.len(),
                remaining = targets.len() - records.len(),
                "인터럽트 수신, 적재 중단"
            );
            break;
        }
        let (record, ticker_stats) =
            ingest_ticker(&config.layout, target.listing.as_ref(), &target.ticker);
        stats.absorb(&ticker_stats);
        records.push(record);
    }

    stats.elapsed = start.elapsed();
    Ok((records, stats))
}

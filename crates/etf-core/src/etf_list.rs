//! ETF 유니버스 목록.
//!
//! 수집 스크립트들이 공유하는 `data/raw/etf_list.json`을 읽습니다.
//! 섹터 → 도메인 → ETF의 3단계 구조를 ETF 단위 목록으로 평탄화합니다.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EtfError, Result};
use crate::record::EtfRecord;
use crate::types::{Label, Ticker};

#[derive(Debug, Deserialize)]
struct EtfListFile {
    #[serde(rename = "Secteurs")]
    sectors: Vec<SectorEntry>,
}

#[derive(Debug, Deserialize)]
struct SectorEntry {
    #[serde(rename = "Nom")]
    name: String,
    #[serde(rename = "Domaines")]
    domains: Vec<DomainEntry>,
}

#[derive(Debug, Deserialize)]
struct DomainEntry {
    #[serde(rename = "Nom")]
    name: String,
    #[serde(rename = "ETFs")]
    etfs: Vec<EtfEntry>,
}

#[derive(Debug, Deserialize)]
struct EtfEntry {
    #[serde(rename = "Ticker")]
    ticker: String,
    #[serde(rename = "Nom")]
    name: String,
}

/// 유니버스의 ETF 한 종목.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EtfListing {
    pub ticker: String,
    pub name: String,
    pub sector: String,
    pub domain: String,
}

impl EtfListing {
    /// 목록 정보를 레코드의 기본 정보에 채웁니다.
    ///
    /// 길이 제한을 넘는 값이 있으면 실패하며 기본 정보는 변경되지 않습니다.
    pub fn seed_identity(&self, record: &mut EtfRecord) -> Result<()> {
        let ticker = Ticker::new("ticker", self.ticker.as_str())?;
        let name = Label::new("name", self.name.as_str())?;
        let sector = Label::new("sector", self.sector.as_str())?;
        let domain = Label::new("domain", self.domain.as_str())?;

        record.identity.ticker = ticker;
        record.identity.name = name;
        record.identity.sector = sector;
        record.identity.domain = domain;
        Ok(())
    }
}

/// 유니버스 파일을 읽어 파일 순서대로 ETF 목록을 반환합니다.
pub fn load_etf_list(path: impl AsRef<Path>) -> Result<Vec<EtfListing>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|e| EtfError::io(path, e))?;
    let file: EtfListFile = serde_json::from_str(&contents).map_err(|e| {
        if e.is_data() {
            EtfError::InvalidData(format!("{}: {}", path.display(), e))
        } else {
            EtfError::json(path, e)
        }
    })?;

    let listings: Vec<EtfListing> = file
        .sectors
        .into_iter()
        .flat_map(|sector| {
            sector.domains.into_iter().flat_map(move |domain| {
                let sector_name = sector.name.clone();
                domain.etfs.into_iter().map(move |etf| EtfListing {
                    ticker: etf.ticker,
                    name: etf.name,
                    sector: sector_name.clone(),
                    domain: domain.name.clone(),
                })
            })
        })
        .collect();

    tracing::info!(path = %path.display(), count = listings.len(), "ETF 목록 로드");
    Ok(listings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::test_support::json_file;

    const LIST: &str = r#"{
        "Secteurs": [
            {"Nom": "Technologie", "Domaines": [
                {"Nom": "Semi-conducteurs", "ETFs": [
                    {"Ticker": "SOXX", "Nom": "iShares Semiconductor ETF"},
                    {"Ticker": "SMH", "Nom": "VanEck Semiconductor ETF"}
                ]},
                {"Nom": "Logiciels", "ETFs": [{"Ticker": "IGV", "Nom": "iShares Expanded Tech-Software"}]}
            ]},
            {"Nom": "Energie", "Domaines": [
                {"Nom": "Petrole", "ETFs": [{"Ticker": "XLE", "Nom": "Energy Select Sector SPDR"}]}
            ]}
        ]
    }"#;

    #[test]
    fn test_flattens_in_file_order() {
        let file = json_file(LIST);
        let listings = load_etf_list(file.path()).unwrap();

        let tickers: Vec<&str> = listings.iter().map(|l| l.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["SOXX", "SMH", "IGV", "XLE"]);
        assert_eq!(listings[2].sector, "Technologie");
        assert_eq!(listings[2].domain, "Logiciels");
        assert_eq!(listings[3].sector, "Energie");
    }

    #[test]
    fn test_missing_key_is_invalid_data() {
        let file = json_file(r#"{"Secteurs": [{"Nom": "Energie"}]}"#);
        let err = load_etf_list(file.path()).unwrap_err();
        assert!(matches!(err, EtfError::InvalidData(_)));
    }

    #[test]
    fn test_seed_identity() {
        let listing = EtfListing {
            ticker: "SOXX".to_string(),
            name: "iShares Semiconductor ETF".to_string(),
            sector: "Technologie".to_string(),
            domain: "Semi-conducteurs".to_string(),
        };
        let mut record = EtfRecord::new();

        listing.seed_identity(&mut record).unwrap();

        assert_eq!(record.identity.ticker, "SOXX");
        assert_eq!(record.identity.domain, "Semi-conducteurs");
        assert_eq!(record.identity.timestamp, 0);
    }
}

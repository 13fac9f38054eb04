//! # ETF Core
//!
//! ETF 데이터 레코드와 수집 스크립트 출력 파서를 제공합니다.
//!
//! - 한 종목의 데이터 레코드 (`EtfRecord`)와 생명주기
//! - 기술적 지표, 재무제표, 투자의견/일정, 기본 정보 파서
//! - ETF 유니버스 목록 로더
//! - 로깅 인프라

pub mod error;
pub mod etf_list;
pub mod logging;
pub mod parsers;
pub mod record;
pub mod types;

pub use error::{EtfError, Result};
pub use etf_list::{load_etf_list, EtfListing};
pub use logging::{init_logging, LogConfig, LogFormat};
pub use parsers::{
    parse_additional_json, parse_financials_json, parse_identity_json, parse_indicator_json,
    parse_technical_json, read_source_status, SourceStatus,
};
pub use record::*;
pub use types::*;

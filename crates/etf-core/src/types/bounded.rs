//! 길이가 제한된 문자열 타입.
//!
//! 티커, 이름, 섹터 등 식별자/라벨 필드는 길이 상한을 갖습니다.
//! 상한을 넘는 입력은 잘라내지 않고 `EtfError::FieldTooLong`으로 거부합니다.

use std::fmt;
use std::ops::Deref;

use serde::{Serialize, Serializer};

use crate::error::{EtfError, Result};

/// 티커 최대 길이 (문자 수)
pub const TICKER_MAX_LEN: usize = 10;
/// 이름/섹터/도메인/증권사 라벨 최대 길이
pub const LABEL_MAX_LEN: usize = 100;
/// 투자의견 등급/액션 최대 길이
pub const GRADE_MAX_LEN: usize = 32;

/// 최대 `MAX`자까지 담는 불변 문자열.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BoundedString<const MAX: usize>(String);

/// ETF 티커 (예: SPY, QQQ)
pub type Ticker = BoundedString<TICKER_MAX_LEN>;
/// 이름, 섹터, 도메인 등 표시용 라벨
pub type Label = BoundedString<LABEL_MAX_LEN>;
/// 투자의견 등급 및 액션 (예: Buy, Outperform, up)
pub type Grade = BoundedString<GRADE_MAX_LEN>;

impl<const MAX: usize> BoundedString<MAX> {
    /// 길이를 검증하여 생성합니다.
    ///
    /// `field`는 에러 메시지에 쓰이는 필드 이름입니다.
    pub fn new(field: &'static str, value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        let actual = value.chars().count();
        if actual > MAX {
            return Err(EtfError::FieldTooLong {
                field,
                max: MAX,
                actual,
            });
        }
        Ok(Self(value))
    }

    /// 최대 길이
    pub const fn max_len() -> usize {
        MAX
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl<const MAX: usize> Deref for BoundedString<MAX> {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl<const MAX: usize> AsRef<str> for BoundedString<MAX> {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<const MAX: usize> fmt::Display for BoundedString<MAX> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<const MAX: usize> PartialEq<str> for BoundedString<MAX> {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl<const MAX: usize> PartialEq<&str> for BoundedString<MAX> {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl<const MAX: usize> Serialize for BoundedString<MAX> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

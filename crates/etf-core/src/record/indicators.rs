//! 기술적 지표 값.

use serde::Serialize;
use serde_json::{Map, Value};

/// 이동평균, RSI, MACD 계열 지표 8종.
///
/// 소스에 없는 값은 0으로 남으며 "없음"을 나타내는 별도 값은 없습니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TechnicalIndicators {
    pub sma_20: f64,
    pub sma_50: f64,
    pub ema_20: f64,
    pub ema_50: f64,
    pub rsi_14: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub macd_hist: f64,
}

/// JSON 키 이름 목록 (필드 선언 순서와 동일)
pub const INDICATOR_KEYS: [&str; 8] = [
    "SMA_20",
    "SMA_50",
    "EMA_20",
    "EMA_50",
    "RSI_14",
    "MACD",
    "MACD_Signal",
    "MACD_Hist",
];

impl TechnicalIndicators {
    /// JSON 키에 대응하는 필드를 가변 참조로 반환합니다.
    pub fn field_mut(&mut self, key: &str) -> Option<&mut f64> {
        let field = match key {
            "SMA_20" => &mut self.sma_20,
            "SMA_50" => &mut self.sma_50,
            "EMA_20" => &mut self.ema_20,
            "EMA_50" => &mut self.ema_50,
            "RSI_14" => &mut self.rsi_14,
            "MACD" => &mut self.macd,
            "MACD_Signal" => &mut self.macd_signal,
            "MACD_Hist" => &mut self.macd_hist,
            _ => return None,
        };
        Some(field)
    }

    /// JSON 키에 대응하는 필드 값을 반환합니다.
    pub fn get(&self, key: &str) -> Option<f64> {
        let mut copy = *self;
        copy.field_mut(key).map(|v| *v)
    }

    /// JSON 객체의 숫자 값만 덮어씁니다.
    ///
    /// 키가 없거나 숫자가 아니면 기존 값을 유지합니다. 적용된 필드 수를 반환합니다.
    pub fn merge_from(&mut self, object: &Map<String, Value>) -> usize {
        let mut applied = 0;
        for key in INDICATOR_KEYS {
            let Some(value) = object.get(key).and_then(number_value) else {
                continue;
            };
            if let Some(field) = self.field_mut(key) {
                *field = value;
                applied += 1;
            }
        }
        applied
    }
}

/// JSON 숫자를 `f64`로 변환합니다. 숫자가 아니면 `None`.
///
/// `f64` 범위를 넘는 값(예: `1e400`)은 거부하지 않고 ±inf가 됩니다.
pub(crate) fn number_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.to_string().parse().ok(),
        _ => None,
    }
}

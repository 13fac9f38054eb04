//! 레코드 전반에서 사용되는 공통 타입.

mod bounded;

pub use bounded::*;

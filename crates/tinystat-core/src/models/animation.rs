//! 카운터 애니메이션 모델.

use serde::{Deserialize, Serialize};

use super::stats::MetricId;

/// 지표 하나에 대한 한 주기의 애니메이션 요청
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationRequest {
    /// 대상 지표
    pub metric: MetricId,
    /// 시작값 (이전 표시값, 없으면 `to`)
    pub from: u64,
    /// 목표값
    pub to: u64,
}

impl AnimationRequest {
    /// 값 변화가 없는 요청인지
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }
}

/// 숫자 표시 옵션
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountOptions {
    /// 이징 사용 여부 (대시보드는 선형만 사용)
    #[serde(default)]
    pub use_easing: bool,
    /// 천 단위 구분 사용
    #[serde(default = "default_true")]
    pub use_grouping: bool,
    /// 천 단위 구분자
    #[serde(default = "default_separator")]
    pub separator: String,
    /// 소수점 문자
    #[serde(default = "default_decimal")]
    pub decimal: String,
    /// 소수 자릿수
    #[serde(default)]
    pub decimals: usize,
    /// 앞에 붙일 문자열
    #[serde(default)]
    pub prefix: Option<String>,
    /// 뒤에 붙일 문자열
    #[serde(default)]
    pub suffix: Option<String>,
}

impl Default for CountOptions {
    fn default() -> Self {
        Self {
            use_easing: false,
            use_grouping: true,
            separator: default_separator(),
            decimal: default_decimal(),
            decimals: 0,
            prefix: None,
            suffix: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_separator() -> String {
    ",".to_string()
}

fn default_decimal() -> String {
    ".".to_string()
}

//! 카운터 애니메이터 포트.
//!
//! 구현: `tinystat-widget` crate (`TickingAnimator`)

use thiserror::Error;

use crate::models::animation::CountOptions;

/// 애니메이션 시작 실패
///
/// 호출자는 로그만 남기고 해당 지표를 건너뛴다.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnimationError {
    /// 대상 요소가 화면에 없음
    #[error("대상 요소 미발견: {0}")]
    ElementNotFound(String),

    /// 지속 시간이 음수이거나 유한하지 않음
    #[error("잘못된 지속 시간: {0}")]
    InvalidDuration(f64),
}

/// 숫자 텍스트를 `from`에서 `to`까지 애니메이션하는 기능
///
/// 애니메이션 자체는 백그라운드에서 진행되며, 이 호출은 시작 여부만 반환한다.
pub trait CounterAnimator: Send + Sync {
    /// 요소 하나의 애니메이션 시작
    fn animate(
        &self,
        element_id: &str,
        from: u64,
        to: u64,
        duration_secs: f64,
        options: &CountOptions,
    ) -> Result<(), AnimationError>;
}

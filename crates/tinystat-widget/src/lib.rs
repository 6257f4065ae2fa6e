//! # tinystat-widget
//!
//! 라이브 카운터 위젯.
//! 통계 스냅샷을 주기적으로 조회하고, 직전 표시값과 비교해 카운터마다
//! 이전 값에서 새 값으로 애니메이션한다. 앱 자격증명 발급 폼도 함께 제공한다.
//!
//! - [`scheduler`]: 폴링 루프 (응답 완료 후 고정 대기, 실패 정책)
//! - [`reconciler`]: 표시 상태 소유, (from, to) 계산, 커밋
//! - [`animator`]: `CounterAnimator` 포트의 틱 기반 구현
//! - [`count_up`]: 보간/포맷
//! - [`provisioning`]: 앱 생성 폼 처리

pub mod animator;
pub mod count_up;
pub mod provisioning;
pub mod reconciler;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod test_support;

//! 스냅샷 조정기.
//!
//! 새 스냅샷과 마지막 표시 상태를 비교해 지표별 (from, to) 애니메이션을 만들고,
//! 애니메이터에 넘긴 뒤 표시 상태를 새 스냅샷으로 교체한다.

use std::sync::Arc;
use tinystat_core::config::AnimationConfig;
use tinystat_core::models::animation::AnimationRequest;
use tinystat_core::models::stats::{MetricId, StatSnapshot};
use tinystat_core::ports::animator::{AnimationError, CounterAnimator};
use tracing::{debug, warn};

/// 마지막으로 조정 완료된 스냅샷
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayState {
    last: Option<StatSnapshot>,
}

impl DisplayState {
    /// 빈 상태 (첫 폴링 전)
    pub fn empty() -> Self {
        Self::default()
    }

    /// 지표의 마지막 표시값
    pub fn value(&self, metric: MetricId) -> Option<u64> {
        self.last.map(|s| s.get(metric))
    }

    /// 마지막 스냅샷
    pub fn snapshot(&self) -> Option<&StatSnapshot> {
        self.last.as_ref()
    }

    /// 아직 아무것도 표시하지 않았는지
    pub fn is_empty(&self) -> bool {
        self.last.is_none()
    }
}

/// 지표 하나의 조정 결과
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileEntry {
    pub request: AnimationRequest,
    pub outcome: Result<(), AnimationError>,
}

/// 표시 상태와 새 스냅샷으로 애니메이션 요청 생성
///
/// 이전 값이 없으면 `from = to` (첫 표시에서 0부터 올라가지 않음).
/// 값이 줄어든 경우도 그대로 둔다.
pub fn plan(state: &DisplayState, snapshot: &StatSnapshot) -> Vec<AnimationRequest> {
    MetricId::ALL
        .iter()
        .map(|&metric| {
            let to = snapshot.get(metric);
            AnimationRequest {
                metric,
                from: state.value(metric).unwrap_or(to),
                to,
            }
        })
        .collect()
}

/// 스냅샷 조정기. 표시 상태를 단독으로 소유하고 갱신한다.
pub struct SnapshotReconciler {
    state: DisplayState,
    animator: Arc<dyn CounterAnimator>,
    animation: AnimationConfig,
}

impl SnapshotReconciler {
    /// 새 조정기 생성 (빈 표시 상태)
    pub fn new(animator: Arc<dyn CounterAnimator>, animation: AnimationConfig) -> Self {
        Self {
            state: DisplayState::empty(),
            animator,
            animation,
        }
    }

    /// 현재 표시 상태
    pub fn display_state(&self) -> &DisplayState {
        &self.state
    }

    /// 스냅샷 하나를 조정
    ///
    /// 애니메이션 시작 실패는 로그만 남기고 나머지 지표는 계속 진행한다.
    /// 모든 요청을 넘긴 뒤 표시 상태를 한 번에 교체한다.
    pub fn reconcile(&mut self, snapshot: StatSnapshot) -> Vec<ReconcileEntry> {
        let requests = plan(&self.state, &snapshot);
        let mut entries = Vec::with_capacity(requests.len());

        for request in requests {
            let options = self.animation.count_options(request.metric);
            let outcome = self.animator.animate(
                request.metric.element_id(),
                request.from,
                request.to,
                self.animation.duration_secs,
                &options,
            );

            match &outcome {
                Ok(()) => debug!(
                    "카운터 갱신: {} {} → {}",
                    request.metric, request.from, request.to
                ),
                Err(e) => warn!("카운터 애니메이션 건너뜀 ({}): {e}", request.metric),
            }
            entries.push(ReconcileEntry { request, outcome });
        }

        self.state = DisplayState {
            last: Some(snapshot),
        };
        entries
    }
}

//! 통계 스냅샷 모델.
//!
//! `GET /v1/stats` 응답과 화면에 표시되는 카운터 식별자를 정의한다.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 대시보드에 표시되는 지표 식별자
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricId {
    /// 기록된 액션 수
    ActionsRecorded,
    /// 계산된 카운트 수
    CountsCalculated,
    /// 계산된 요약 수
    SummariesCalculated,
}

impl MetricId {
    /// 조정(reconcile) 순서를 고정한 전체 지표 목록
    pub const ALL: [MetricId; 3] = [
        MetricId::ActionsRecorded,
        MetricId::CountsCalculated,
        MetricId::SummariesCalculated,
    ];

    /// 화면 요소 ID (JSON 필드명과 동일)
    pub fn element_id(&self) -> &'static str {
        match self {
            MetricId::ActionsRecorded => "actionsRecorded",
            MetricId::CountsCalculated => "countsCalculated",
            MetricId::SummariesCalculated => "summariesCalculated",
        }
    }

    /// 요소 ID로 지표 조회
    pub fn from_element_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.element_id() == id)
    }

    /// 터미널 표시용 라벨
    pub fn label(&self) -> &'static str {
        match self {
            MetricId::ActionsRecorded => "Actions Recorded",
            MetricId::CountsCalculated => "Counts Calculated",
            MetricId::SummariesCalculated => "Summaries Calculated",
        }
    }
}

impl fmt::Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_id())
    }
}

/// 서버가 내려주는 카운터 스냅샷
///
/// 수신 후 불변이며, 다음 스냅샷이 통째로 대체한다 (필드 단위 병합 없음).
/// 서버가 함께 보내는 `apps` 등 알 수 없는 필드는 무시한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatSnapshot {
    /// 기록된 액션 수
    pub actions_recorded: u64,
    /// 계산된 카운트 수
    pub counts_calculated: u64,
    /// 계산된 요약 수
    pub summaries_calculated: u64,
}

impl StatSnapshot {
    /// 지표별 값 조회
    pub fn get(&self, metric: MetricId) -> u64 {
        match metric {
            MetricId::ActionsRecorded => self.actions_recorded,
            MetricId::CountsCalculated => self.counts_calculated,
            MetricId::SummariesCalculated => self.summaries_calculated,
        }
    }
}

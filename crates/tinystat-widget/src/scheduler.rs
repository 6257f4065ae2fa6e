//! 통계 폴링 스케줄러.
//!
//! 조회 → 조정 → 고정 대기 → 반복. 대기는 응답 완료 시점부터 재므로
//! 요청은 항상 하나만 진행 중이다.

use std::sync::Arc;
use std::time::Duration;
use tinystat_core::config::{AppConfig, FailurePolicy};
use tinystat_core::error::CoreError;
use tinystat_core::ports::stats_api::StatsApi;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::reconciler::SnapshotReconciler;

/// 스케줄러 설정
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// 응답 완료 후 다음 요청까지 대기
    pub poll_interval: Duration,
    /// 조회 실패 시 동작
    pub failure_policy: FailurePolicy,
    /// Retry 정책의 최대 대기
    pub max_backoff: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(10),
            failure_policy: FailurePolicy::Halt,
            max_backoff: Duration::from_secs(300),
        }
    }
}

impl From<&AppConfig> for SchedulerConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            poll_interval: config.poll_interval(),
            failure_policy: config.poll.failure_policy,
            max_backoff: config.max_backoff(),
        }
    }
}

/// 루프 종료 사유
#[derive(Debug)]
pub enum ExitReason {
    /// 조회 실패로 중단 (Halt 정책)
    Halted(CoreError),
    /// 종료 신호 수신
    Shutdown,
}

/// 루프 종료 보고
#[derive(Debug)]
pub struct PollReport {
    pub reason: ExitReason,
    /// 성공한 주기 수
    pub cycles: u64,
    /// 실패한 주기 수
    pub failures: u64,
}

/// Retry 정책의 n번째 연속 실패 후 대기 시간
pub fn backoff_delay(interval: Duration, consecutive_failures: u32, max: Duration) -> Duration {
    let factor = 2u32.saturating_pow(consecutive_failures.min(16));
    interval.saturating_mul(factor).min(max)
}

/// 종료 신호 대기. 송신자가 사라지면 영원히 대기한다.
async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// 폴링 스케줄러
pub struct PollScheduler {
    config: SchedulerConfig,
    api: Arc<dyn StatsApi>,
    reconciler: SnapshotReconciler,
}

impl PollScheduler {
    /// 새 스케줄러 생성
    pub fn new(
        config: SchedulerConfig,
        api: Arc<dyn StatsApi>,
        reconciler: SnapshotReconciler,
    ) -> Self {
        Self {
            config,
            api,
            reconciler,
        }
    }

    /// 백그라운드 태스크로 루프 시작
    ///
    /// 스케줄러를 소비하므로 인스턴스당 한 번만 시작된다.
    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<PollReport> {
        tokio::spawn(self.run(shutdown))
    }

    /// 루프 실행 (종료 신호 또는 Halt 정책의 실패까지)
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> PollReport {
        info!(
            "통계 폴링 시작: 주기={}ms, 실패 정책={:?}",
            self.config.poll_interval.as_millis(),
            self.config.failure_policy
        );

        let mut cycles = 0u64;
        let mut failures = 0u64;
        let mut consecutive_failures = 0u32;

        let reason = loop {
            let result = tokio::select! {
                result = self.api.fetch_stats() => result,
                _ = wait_for_shutdown(&mut shutdown) => break ExitReason::Shutdown,
            };

            let delay = match result {
                Ok(snapshot) => {
                    cycles += 1;
                    consecutive_failures = 0;
                    debug!("스냅샷 수신 (주기 {cycles}): {snapshot:?}");
                    self.reconciler.reconcile(snapshot);
                    self.config.poll_interval
                }
                Err(e) => {
                    failures += 1;
                    match self.config.failure_policy {
                        // 원래 대시보드는 성공 응답에서만 다음 주기를 예약했다.
                        // 서버 보호를 위한 의도인지 누락인지 불분명하므로 기본값은 그대로 멈춘다.
                        FailurePolicy::Halt => {
                            warn!("통계 조회 실패, 폴링 중단: {e}");
                            break ExitReason::Halted(e);
                        }
                        FailurePolicy::Retry => {
                            consecutive_failures = consecutive_failures.saturating_add(1);
                            let delay = backoff_delay(
                                self.config.poll_interval,
                                consecutive_failures,
                                self.config.max_backoff,
                            );
                            warn!(
                                "통계 조회 실패 (연속 {consecutive_failures}회): {e}, {delay:?} 후 재시도"
                            );
                            delay
                        }
                    }
                }
            };

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = wait_for_shutdown(&mut shutdown) => break ExitReason::Shutdown,
            }
        };

        info!("통계 폴링 종료: {reason:?} (성공 {cycles}회, 실패 {failures}회)");
        PollReport {
            reason,
            cycles,
            failures,
        }
    }
}

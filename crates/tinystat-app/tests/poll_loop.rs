//! 폴링 루프 통합 테스트
//!
//! Mock 서버, 실제 HTTP 클라이언트, 실제 애니메이터를 연결한다.
//!
//! 실행:
//! ```
//! cargo test -p tinystat-app --test poll_loop -- --nocapture
//! ```

mod mock_server;

use mock_server::{MockServer, STEP};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tinystat_core::config::{AnimationConfig, FailurePolicy};
use tinystat_core::error::CoreError;
use tinystat_core::models::stats::MetricId;
use tinystat_core::ports::surface::CounterSurface;
use tinystat_network::http_client::HttpStatsClient;
use tinystat_widget::animator::TickingAnimator;
use tinystat_widget::reconciler::SnapshotReconciler;
use tinystat_widget::scheduler::{ExitReason, PollReport, PollScheduler, SchedulerConfig};
use tokio::sync::watch;
use tokio::task::JoinHandle;

const INTERVAL: Duration = Duration::from_millis(80);

/// 요소별 마지막 텍스트만 보관하는 표시 영역
#[derive(Default)]
struct LatestSurface {
    texts: Mutex<HashMap<String, String>>,
}

impl LatestSurface {
    fn text(&self, metric: MetricId) -> Option<String> {
        self.texts.lock().get(metric.element_id()).cloned()
    }
}

impl CounterSurface for LatestSurface {
    fn has_element(&self, element_id: &str) -> bool {
        MetricId::from_element_id(element_id).is_some()
    }

    fn set_text(&self, element_id: &str, text: &str) -> Result<(), CoreError> {
        self.texts
            .lock()
            .insert(element_id.to_string(), text.to_string());
        Ok(())
    }
}

fn animation() -> AnimationConfig {
    AnimationConfig {
        duration_secs: 0.04,
        frame_interval_ms: 10,
        ..AnimationConfig::default()
    }
}

fn start_loop(
    server: &MockServer,
    policy: FailurePolicy,
    surface: Arc<LatestSurface>,
) -> (watch::Sender<bool>, JoinHandle<PollReport>) {
    let client = Arc::new(HttpStatsClient::new(server.url(), Duration::from_secs(5)).unwrap());
    let animator = Arc::new(TickingAnimator::new(surface, Duration::from_millis(10)));
    let reconciler = SnapshotReconciler::new(animator, animation());
    let scheduler = PollScheduler::new(
        SchedulerConfig {
            poll_interval: INTERVAL,
            failure_policy: policy,
            max_backoff: Duration::from_millis(200),
        },
        client,
        reconciler,
    );

    let (tx, rx) = watch::channel(false);
    (tx, scheduler.spawn(rx))
}

/// 1,000 단위 그룹 표기
fn grouped(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[tokio::test]
async fn counters_follow_server_snapshots() {
    let server = MockServer::start().await;
    let surface = Arc::new(LatestSurface::default());
    let (tx, handle) = start_loop(&server, FailurePolicy::Halt, surface.clone());

    tokio::time::sleep(INTERVAL * 5).await;
    tx.send(true).unwrap();
    let report = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("폴링 루프가 종료되지 않음")
        .unwrap();

    assert!(matches!(report.reason, ExitReason::Shutdown));
    assert!(report.cycles >= 2, "cycles = {}", report.cycles);
    assert_eq!(report.failures, 0);

    // 마지막 애니메이션 완료 대기
    tokio::time::sleep(Duration::from_millis(200)).await;

    let expected = grouped(report.cycles * STEP);
    for metric in MetricId::ALL {
        assert_eq!(surface.text(metric).as_deref(), Some(expected.as_str()));
    }
}

#[tokio::test]
async fn halt_policy_stops_polling_after_failure() {
    let server = MockServer::start().await;
    server.fail_from(3);
    let surface = Arc::new(LatestSurface::default());
    let (_tx, handle) = start_loop(&server, FailurePolicy::Halt, surface.clone());

    let report = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("폴링 루프가 중단되지 않음")
        .unwrap();

    assert!(matches!(
        report.reason,
        ExitReason::Halted(CoreError::Internal(_))
    ));
    assert_eq!(report.cycles, 2);
    assert_eq!(report.failures, 1);

    // 중단 이후 추가 요청 없음, 마지막 성공 값 유지
    tokio::time::sleep(INTERVAL * 4).await;
    assert_eq!(server.stats_requests(), 3);
    assert_eq!(
        surface.text(MetricId::ActionsRecorded).as_deref(),
        Some(grouped(2 * STEP).as_str())
    );
}

#[tokio::test]
async fn retry_policy_recovers_after_transient_failure() {
    let server = MockServer::start().await;
    server.fail_request(2);
    let surface = Arc::new(LatestSurface::default());
    let (tx, handle) = start_loop(&server, FailurePolicy::Retry, surface.clone());

    tokio::time::sleep(INTERVAL * 6).await;
    tx.send(true).unwrap();
    let report = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("폴링 루프가 종료되지 않음")
        .unwrap();

    assert!(matches!(report.reason, ExitReason::Shutdown));
    assert_eq!(report.failures, 1);
    assert!(report.cycles >= 2, "cycles = {}", report.cycles);
}

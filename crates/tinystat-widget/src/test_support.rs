//! 단위 테스트용 포트 대역.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tinystat_core::error::CoreError;
use tinystat_core::models::animation::CountOptions;
use tinystat_core::models::app::AppCredentials;
use tinystat_core::models::stats::{MetricId, StatSnapshot};
use tinystat_core::ports::animator::{AnimationError, CounterAnimator};
use tinystat_core::ports::stats_api::StatsApi;
use tinystat_core::ports::surface::{BusyIndicator, CounterSurface, CredentialPresenter};
use tokio::sync::watch;
use tokio::time::Instant;

pub fn snapshot(a: u64, b: u64, c: u64) -> StatSnapshot {
    StatSnapshot {
        actions_recorded: a,
        counts_calculated: b,
        summaries_calculated: c,
    }
}

/// 요소별 프레임을 기록하는 표시 영역
#[derive(Default)]
pub struct RecordingSurface {
    elements: Vec<String>,
    frames: Mutex<HashMap<String, Vec<String>>>,
}

impl RecordingSurface {
    pub fn with_metric_elements() -> Self {
        Self {
            elements: MetricId::ALL
                .iter()
                .map(|m| m.element_id().to_string())
                .collect(),
            frames: Mutex::new(HashMap::new()),
        }
    }

    pub fn frames(&self, element_id: &str) -> Vec<String> {
        self.frames
            .lock()
            .get(element_id)
            .cloned()
            .unwrap_or_default()
    }
}

impl CounterSurface for RecordingSurface {
    fn has_element(&self, element_id: &str) -> bool {
        self.elements.iter().any(|e| e == element_id)
    }

    fn set_text(&self, element_id: &str, text: &str) -> Result<(), CoreError> {
        self.frames
            .lock()
            .entry(element_id.to_string())
            .or_default()
            .push(text.to_string());
        Ok(())
    }
}

/// animate 호출을 기록하는 애니메이터
#[derive(Default)]
pub struct RecordingAnimator {
    pub calls: Mutex<Vec<(String, u64, u64, f64)>>,
    pub reject: Option<String>,
}

impl RecordingAnimator {
    pub fn rejecting(element_id: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            reject: Some(element_id.to_string()),
        }
    }

    pub fn take(&self) -> Vec<(String, u64, u64, f64)> {
        std::mem::take(&mut *self.calls.lock())
    }
}

impl CounterAnimator for RecordingAnimator {
    fn animate(
        &self,
        element_id: &str,
        from: u64,
        to: u64,
        duration_secs: f64,
        _options: &CountOptions,
    ) -> Result<(), AnimationError> {
        if self.reject.as_deref() == Some(element_id) {
            return Err(AnimationError::ElementNotFound(element_id.to_string()));
        }
        self.calls
            .lock()
            .push((element_id.to_string(), from, to, duration_secs));
        Ok(())
    }
}

/// 준비된 응답을 순서대로 돌려주는 API 대역
///
/// 응답이 바닥나면 종료 신호를 보내고 네트워크 에러를 반환한다.
pub struct ScriptedApi {
    script: Mutex<VecDeque<Result<StatSnapshot, CoreError>>>,
    latency: Duration,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub calls: Mutex<Vec<Instant>>,
    shutdown_tx: watch::Sender<bool>,
    pub create_calls: Mutex<Vec<(String, bool)>>,
    pub create_result: Mutex<Option<Result<AppCredentials, CoreError>>>,
}

impl ScriptedApi {
    pub fn new(
        script: Vec<Result<StatSnapshot, CoreError>>,
        latency: Duration,
    ) -> (Self, watch::Receiver<bool>) {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let api = Self {
            script: Mutex::new(script.into()),
            latency,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
            shutdown_tx,
            create_calls: Mutex::new(Vec::new()),
            create_result: Mutex::new(None),
        };
        (api, shutdown_rx)
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl StatsApi for ScriptedApi {
    async fn fetch_stats(&self) -> Result<StatSnapshot, CoreError> {
        self.calls.lock().push(Instant::now());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(self.latency).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        let next = self.script.lock().pop_front();
        match next {
            Some(result) => result,
            None => {
                let _ = self.shutdown_tx.send(true);
                Err(CoreError::Network("script exhausted".to_string()))
            }
        }
    }

    async fn create_app(
        &self,
        name: &str,
        strict_auth: bool,
    ) -> Result<AppCredentials, CoreError> {
        self.create_calls
            .lock()
            .push((name.to_string(), strict_auth));
        self.create_result
            .lock()
            .take()
            .unwrap_or_else(|| Err(CoreError::Network("no response scripted".to_string())))
    }
}

#[derive(Default)]
pub struct FlagBusy {
    busy: AtomicBool,
    pub transitions: Mutex<Vec<bool>>,
}

impl BusyIndicator for FlagBusy {
    fn set_busy(&self, busy: bool) {
        self.busy.store(busy, Ordering::SeqCst);
        self.transitions.lock().push(busy);
    }

    fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
pub struct RecordingPresenter {
    pub shown: Mutex<Vec<AppCredentials>>,
}

impl CredentialPresenter for RecordingPresenter {
    fn present(&self, credentials: &AppCredentials) {
        self.shown.lock().push(credentials.clone());
    }
}

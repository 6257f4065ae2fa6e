//! 틱 기반 카운터 애니메이터.
//!
//! `CounterAnimator` 포트 구현. 요소마다 tokio 태스크 하나가 프레임 간격으로
//! 보간된 값을 `CounterSurface`에 기록한다. 같은 요소에 새 요청이 오면
//! 진행 중인 태스크를 중단하고 새 요청으로 대체한다.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tinystat_core::models::animation::CountOptions;
use tinystat_core::ports::animator::{AnimationError, CounterAnimator};
use tinystat_core::ports::surface::CounterSurface;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, warn};

use crate::count_up::{format_count, format_value, interpolate, validate_duration};

/// 틱 기반 애니메이터
pub struct TickingAnimator {
    surface: Arc<dyn CounterSurface>,
    frame_interval: Duration,
    /// 요소별 진행 중인 애니메이션
    running: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl TickingAnimator {
    /// 새 애니메이터 생성
    pub fn new(surface: Arc<dyn CounterSurface>, frame_interval: Duration) -> Self {
        Self {
            surface,
            frame_interval: frame_interval.max(Duration::from_millis(1)),
            running: Mutex::new(HashMap::new()),
        }
    }

    /// 요소의 애니메이션이 아직 진행 중인지
    pub fn is_animating(&self, element_id: &str) -> bool {
        self.running
            .lock()
            .get(element_id)
            .is_some_and(|handle| !handle.is_finished())
    }

    /// 진행 중인 모든 애니메이션 중단
    pub fn cancel_all(&self) {
        for (_, handle) in self.running.lock().drain() {
            handle.abort();
        }
    }

    fn write(surface: &dyn CounterSurface, element_id: &str, text: &str) {
        if let Err(e) = surface.set_text(element_id, text) {
            warn!("카운터 표시 실패 ({element_id}): {e}");
        }
    }
}

impl CounterAnimator for TickingAnimator {
    fn animate(
        &self,
        element_id: &str,
        from: u64,
        to: u64,
        duration_secs: f64,
        options: &CountOptions,
    ) -> Result<(), AnimationError> {
        if !self.surface.has_element(element_id) {
            return Err(AnimationError::ElementNotFound(element_id.to_string()));
        }
        let total = validate_duration(duration_secs)?;

        let mut running = self.running.lock();
        if let Some(previous) = running.remove(element_id) {
            if !previous.is_finished() {
                debug!("진행 중인 애니메이션 대체: {element_id}");
            }
            previous.abort();
        }

        let runtime = tokio::runtime::Handle::try_current();
        let final_text = format_count(to, options);
        if from == to || total.is_zero() || runtime.is_err() {
            Self::write(self.surface.as_ref(), element_id, &final_text);
            return Ok(());
        }

        Self::write(self.surface.as_ref(), element_id, &format_count(from, options));

        let surface = self.surface.clone();
        let id = element_id.to_string();
        let options = options.clone();
        let frame_interval = self.frame_interval;

        let handle = tokio::spawn(async move {
            let start = Instant::now();
            let mut ticker = tokio::time::interval(frame_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // 첫 틱은 즉시 완료되므로 시작값은 위에서 이미 기록됨
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let elapsed = start.elapsed();
                if elapsed >= total {
                    Self::write(surface.as_ref(), &id, &final_text);
                    break;
                }
                let progress = elapsed.as_secs_f64() / total.as_secs_f64();
                let value = interpolate(from, to, progress);
                Self::write(surface.as_ref(), &id, &format_value(value, &options));
            }
        });
        running.insert(element_id.to_string(), handle);

        Ok(())
    }
}

impl Drop for TickingAnimator {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

//! 터미널 표시 어댑터.
//!
//! 카운터 세 개를 한 줄 상태 표시로 그리고, 폼 처리 중 표시와
//! 발급된 자격증명 출력을 담당한다.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use tinystat_core::error::CoreError;
use tinystat_core::models::app::AppCredentials;
use tinystat_core::models::stats::MetricId;
use tinystat_core::ports::surface::{BusyIndicator, CounterSurface, CredentialPresenter};
use tracing::{debug, info};

/// 아직 값이 없는 카운터 표시
const PLACEHOLDER: &str = "-";

/// 터미널 카운터 표시 영역
pub struct TerminalSurface {
    values: Mutex<BTreeMap<MetricId, String>>,
    /// TTY일 때만 같은 줄을 다시 그림
    interactive: bool,
}

impl TerminalSurface {
    /// 새 표시 영역 생성
    pub fn new(interactive: bool) -> Self {
        let values = MetricId::ALL
            .into_iter()
            .map(|m| (m, PLACEHOLDER.to_string()))
            .collect();
        Self {
            values: Mutex::new(values),
            interactive,
        }
    }

    /// 현재 값으로 상태 줄 생성
    pub fn render_line(&self) -> String {
        let values = self.values.lock();
        values
            .iter()
            .map(|(metric, text)| format!("{}: {}", metric.label(), text))
            .collect::<Vec<_>>()
            .join("  |  ")
    }

    /// 요소의 현재 텍스트
    pub fn text(&self, metric: MetricId) -> Option<String> {
        self.values.lock().get(&metric).cloned()
    }
}

impl CounterSurface for TerminalSurface {
    fn has_element(&self, element_id: &str) -> bool {
        MetricId::from_element_id(element_id).is_some()
    }

    fn set_text(&self, element_id: &str, text: &str) -> Result<(), CoreError> {
        let metric = MetricId::from_element_id(element_id)
            .ok_or_else(|| CoreError::ElementNotFound(element_id.to_string()))?;
        self.values.lock().insert(metric, text.to_string());

        if self.interactive {
            let line = self.render_line();
            let mut stdout = std::io::stdout().lock();
            write!(stdout, "\r\x1b[2K{line}")?;
            stdout.flush()?;
        } else {
            debug!("{element_id} = {text}");
        }
        Ok(())
    }
}

/// 제출 버튼 처리 중 표시
#[derive(Default)]
pub struct TerminalBusy {
    busy: AtomicBool,
}

impl BusyIndicator for TerminalBusy {
    fn set_busy(&self, busy: bool) {
        let was = self.busy.swap(busy, Ordering::SeqCst);
        if busy && !was {
            info!("앱 생성 중...");
        }
    }

    fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }
}

/// 자격증명 출력
pub struct TerminalPresenter;

impl CredentialPresenter for TerminalPresenter {
    fn present(&self, credentials: &AppCredentials) {
        println!();
        println!("AppID: {}", credentials.id);
        println!("AppToken: {}", credentials.token);
    }
}

//! 애플리케이션 설정 구조체.
//!
//! 서버 URL, 폴링 주기와 실패 정책, 카운터 애니메이션 표시 옵션을 정의한다.
//! `ConfigManager`가 JSON 파일에서 로드하고, 환경변수/CLI 인자가 덮어쓴다.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::error::CoreError;
use crate::models::animation::CountOptions;
use crate::models::stats::MetricId;

/// 서버 URL 환경변수
pub const ENV_SERVER_URL: &str = "TINYSTAT_SERVER_URL";
/// 폴링 주기 환경변수 (밀리초)
pub const ENV_POLL_INTERVAL_MS: &str = "TINYSTAT_POLL_INTERVAL_MS";

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 서버 연결 설정
    pub server: ServerConfig,
    /// 폴링 설정
    #[serde(default)]
    pub poll: PollConfig,
    /// 카운터 애니메이션 설정
    #[serde(default)]
    pub animation: AnimationConfig,
}

/// 서버 연결 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// API 서버 기본 URL (예: "https://tinystat.io")
    pub base_url: String,
    /// 요청 타임아웃 (밀리초)
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// HTTP 어댑터 내부 재시도 횟수 (기본 0: 요청은 주기당 한 번)
    #[serde(default)]
    pub max_retries: u32,
}

// ============================================================
// 폴링 설정
// ============================================================

/// 통계 조회 실패 시 폴링 루프의 동작
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// 루프 종료: 이후 요청 없음 (원래 대시보드 동작)
    #[default]
    Halt,
    /// 지수 백오프 후 다음 주기 재개
    Retry,
}

/// 폴링 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// 응답 완료 후 다음 요청까지 대기 (밀리초)
    #[serde(default = "default_poll_interval_ms")]
    pub interval_ms: u64,
    /// 실패 정책
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    /// Retry 정책의 최대 대기 (밀리초)
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_poll_interval_ms(),
            failure_policy: FailurePolicy::Halt,
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

// ============================================================
// 애니메이션 설정
// ============================================================

/// 지표별 앞/뒤 문자열
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affix {
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub suffix: Option<String>,
}

/// 카운터 애니메이션 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// 애니메이션 길이 (초)
    #[serde(default = "default_duration_secs")]
    pub duration_secs: f64,
    /// 프레임 간격 (밀리초)
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
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
    /// 지표별 prefix/suffix (기본 대시보드는 비어 있음)
    #[serde(default)]
    pub affixes: BTreeMap<MetricId, Affix>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration_secs: default_duration_secs(),
            frame_interval_ms: default_frame_interval_ms(),
            use_grouping: true,
            separator: default_separator(),
            decimal: default_decimal(),
            decimals: 0,
            affixes: BTreeMap::new(),
        }
    }
}

impl AnimationConfig {
    /// 지표 하나의 표시 옵션 생성
    pub fn count_options(&self, metric: MetricId) -> CountOptions {
        let affix = self.affixes.get(&metric).cloned().unwrap_or_default();
        CountOptions {
            use_easing: false,
            use_grouping: self.use_grouping,
            separator: self.separator.clone(),
            decimal: self.decimal.clone(),
            decimals: self.decimals,
            prefix: affix.prefix.filter(|p| !p.is_empty()),
            suffix: affix.suffix.filter(|s| !s.is_empty()),
        }
    }

    /// 프레임 간격을 Duration으로 반환
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

impl AppConfig {
    /// 기본 설정 생성
    pub fn default_config() -> Self {
        Self {
            server: ServerConfig {
                base_url: "http://localhost:8080".to_string(),
                request_timeout_ms: default_request_timeout_ms(),
                max_retries: 0,
            },
            poll: PollConfig::default(),
            animation: AnimationConfig::default(),
        }
    }

    /// 요청 타임아웃을 Duration으로 반환
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.server.request_timeout_ms)
    }

    /// 폴링 주기를 Duration으로 반환
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll.interval_ms)
    }

    /// Retry 정책 최대 대기를 Duration으로 반환
    pub fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.poll.max_backoff_ms)
    }

    /// 환경변수 덮어쓰기
    pub fn apply_env_overrides(&mut self) -> Result<(), CoreError> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// 조회 함수로 덮어쓰기 (테스트에서 프로세스 환경을 건드리지 않기 위함)
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_SERVER_URL).filter(|v| !v.trim().is_empty()) {
            self.server.base_url = url.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_POLL_INTERVAL_MS) {
            self.poll.interval_ms = raw.trim().parse().map_err(|e| {
                CoreError::Config(format!("{ENV_POLL_INTERVAL_MS} 파싱 실패 ({raw}): {e}"))
            })?;
        }
        Ok(())
    }

    /// 설정값 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        let url = self.server.base_url.as_str();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(CoreError::Validation {
                field: "server.base_url".to_string(),
                message: format!("http(s) URL이 아님: {url}"),
            });
        }
        if self.poll.interval_ms == 0 {
            return Err(CoreError::Validation {
                field: "poll.interval_ms".to_string(),
                message: "0보다 커야 함".to_string(),
            });
        }
        let duration = self.animation.duration_secs;
        if !duration.is_finite()
            || duration < 0.0
            || Duration::try_from_secs_f64(duration).is_err()
        {
            return Err(CoreError::Validation {
                field: "animation.duration_secs".to_string(),
                message: format!("유효하지 않은 값: {duration}"),
            });
        }
        if self.animation.frame_interval_ms == 0 {
            return Err(CoreError::Validation {
                field: "animation.frame_interval_ms".to_string(),
                message: "0보다 커야 함".to_string(),
            });
        }
        Ok(())
    }
}

// ============================================================
// 기본값 함수
// ============================================================

fn default_true() -> bool {
    true
}

fn default_request_timeout_ms() -> u64 {
    30_000
}
fn default_poll_interval_ms() -> u64 {
    10_000
}
fn default_max_backoff_ms() -> u64 {
    300_000
}
fn default_duration_secs() -> f64 {
    10.0
}
fn default_frame_interval_ms() -> u64 {
    50
}
fn default_separator() -> String {
    ",".to_string()
}
fn default_decimal() -> String {
    ".".to_string()
}

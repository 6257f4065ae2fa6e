//! HTTP REST API 클라이언트.
//!
//! `StatsApi` 포트 구현. 상태 코드별 에러 매핑 + 선택적 재시도.

use async_trait::async_trait;
use tinystat_core::error::CoreError;
use tinystat_core::models::app::AppCredentials;
use tinystat_core::models::stats::StatSnapshot;
use tinystat_core::ports::stats_api::StatsApi;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Retry-After 헤더가 없을 때의 기본 대기 (초)
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// 재시도 가능한 에러인지 판별
fn is_retryable(error: &CoreError) -> bool {
    error.is_transport()
}

/// 앱 생성 URL 구성
///
/// `name`은 경로 세그먼트 하나로 퍼센트 인코딩된다.
/// `.`/`..`은 URL 정규화로 세그먼트가 사라지므로 거부한다.
pub fn app_create_url(base: &Url, name: &str, strict_auth: bool) -> Result<Url, CoreError> {
    if matches!(name, "." | "..") {
        return Err(CoreError::Validation {
            field: "name".to_string(),
            message: format!("경로 세그먼트로 쓸 수 없는 앱 이름: {name}"),
        });
    }
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| CoreError::Config(format!("기본 URL로 사용할 수 없음: {base}")))?
        .pop_if_empty()
        .extend(["v1", "app", "create", name]);
    url.set_query(None);
    if strict_auth {
        url.query_pairs_mut().append_pair("strict_auth", "true");
    }
    Ok(url)
}

/// 통계 조회 URL 구성
pub fn stats_url(base: &Url) -> Result<Url, CoreError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| CoreError::Config(format!("기본 URL로 사용할 수 없음: {base}")))?
        .pop_if_empty()
        .extend(["v1", "stats"]);
    url.set_query(None);
    Ok(url)
}

/// REST API 클라이언트: `StatsApi` 포트 구현
pub struct HttpStatsClient {
    client: reqwest::Client,
    base_url: Url,
    max_retries: u32,
}

impl HttpStatsClient {
    /// 새 HTTP 클라이언트 생성
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CoreError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| CoreError::Config(format!("서버 URL 파싱 실패 ({base_url}): {e}")))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::Network(format!("HTTP 클라이언트 빌드 실패: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            max_retries: 0,
        })
    }

    /// 재시도 횟수 설정
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// 서버 기본 URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// 응답 상태 코드 확인 및 에러 매핑
    async fn check_response(
        &self,
        resource: &str,
        resp: reqwest::Response,
    ) -> Result<reqwest::Response, CoreError> {
        let status = resp.status();

        if status.is_success() {
            return Ok(resp);
        }

        let retry_after = resp
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_RETRY_AFTER_SECS);

        let text = resp.text().await.unwrap_or_else(|e| {
            warn!("응답 본문 읽기 실패: {e}");
            String::new()
        });

        match status.as_u16() {
            404 => Err(CoreError::NotFound {
                resource_type: resource.to_string(),
                id: text,
            }),
            429 => Err(CoreError::RateLimit {
                retry_after_secs: retry_after,
            }),
            503 => Err(CoreError::ServiceUnavailable(text)),
            _ => Err(CoreError::Internal(format!("API 에러 ({status}): {text}"))),
        }
    }

    /// 재시도가 포함된 요청 실행
    ///
    /// 기본값은 재시도 없음 (주기당 요청 1회). 설정 시 1s → 2s → 4s 백오프.
    async fn execute_with_retry<F, Fut, T>(&self, operation: F) -> Result<T, CoreError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T, CoreError>>,
    {
        let mut delay = Duration::from_secs(1);
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    if !is_retryable(&e) || attempt >= self.max_retries {
                        return Err(e);
                    }

                    warn!(
                        "요청 실패 (시도 {}/{}): {e}, {delay:?} 후 재시도",
                        attempt + 1,
                        self.max_retries + 1
                    );

                    if let CoreError::RateLimit { retry_after_secs } = &e {
                        delay = Duration::from_secs(*retry_after_secs);
                    }

                    tokio::time::sleep(delay).await;
                    delay = (delay * 2).min(Duration::from_secs(30));
                    attempt += 1;
                }
            }
        }
    }
}

#[async_trait]
impl StatsApi for HttpStatsClient {
    async fn fetch_stats(&self) -> Result<StatSnapshot, CoreError> {
        let url = stats_url(&self.base_url)?;
        debug!("통계 조회: {url}");

        self.execute_with_retry(|| async {
            let resp = self
                .client
                .get(url.clone())
                .send()
                .await
                .map_err(|e| CoreError::Network(format!("통계 요청 실패: {e}")))?;

            let resp = self.check_response("stats", resp).await?;
            let body = resp
                .bytes()
                .await
                .map_err(|e| CoreError::Network(format!("통계 응답 수신 실패: {e}")))?;
            let snapshot: StatSnapshot = serde_json::from_slice(&body)?;
            Ok(snapshot)
        })
        .await
    }

    async fn create_app(
        &self,
        name: &str,
        strict_auth: bool,
    ) -> Result<AppCredentials, CoreError> {
        let url = app_create_url(&self.base_url, name, strict_auth)?;
        debug!("앱 생성 요청: {url}");

        self.execute_with_retry(|| async {
            let resp = self
                .client
                .post(url.clone())
                .send()
                .await
                .map_err(|e| CoreError::Network(format!("앱 생성 요청 실패: {e}")))?;

            let resp = self.check_response("app", resp).await?;
            let body = resp
                .bytes()
                .await
                .map_err(|e| CoreError::Network(format!("앱 생성 응답 수신 실패: {e}")))?;
            let creds: AppCredentials = serde_json::from_slice(&body)?;

            debug!("앱 생성 성공: id={}", creds.id);
            Ok(creds)
        })
        .await
    }
}

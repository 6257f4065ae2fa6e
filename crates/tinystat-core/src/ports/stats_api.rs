//! 통계 API 포트.
//!
//! 구현: `tinystat-network` crate (reqwest)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::app::AppCredentials;
use crate::models::stats::StatSnapshot;

/// tinystat 서버 API
#[async_trait]
pub trait StatsApi: Send + Sync {
    /// 현재 카운터 스냅샷 조회 (`GET /v1/stats`)
    async fn fetch_stats(&self) -> Result<StatSnapshot, CoreError>;

    /// 새 앱 생성 (`POST /v1/app/create/{name}`)
    ///
    /// `strict_auth`가 true면 `?strict_auth=true`를 붙인다.
    async fn create_app(&self, name: &str, strict_auth: bool)
        -> Result<AppCredentials, CoreError>;
}

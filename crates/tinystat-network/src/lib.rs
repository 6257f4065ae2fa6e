//! # tinystat-network
//!
//! tinystat 서버 HTTP 어댑터.
//! `GET /v1/stats` 스냅샷 조회와 `POST /v1/app/create/{name}` 앱 생성을 담당하며
//! 상태 코드별 에러 매핑과 선택적 재시도를 제공한다.
//!
//! ## 사용 예시
//!
//! ```rust,ignore
//! use tinystat_network::http_client::HttpStatsClient;
//!
//! let client = HttpStatsClient::new("https://tinystat.io", Duration::from_secs(30))?;
//! let snapshot = client.fetch_stats().await?;
//! ```

pub mod http_client;

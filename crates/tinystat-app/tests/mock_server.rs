//! Mock 서버 모듈
//!
//! 대시보드 통합 테스트를 위한 경량 tinystat 서버.
//! Axum 기반으로 `/v1/stats`와 `/v1/app/create/{name}`을 모의합니다.

#![allow(dead_code)]

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// 통계 응답 한 단계 증가량
pub const STEP: u64 = 1000;

/// Mock 서버 상태
#[derive(Debug, Default)]
pub struct MockServerState {
    /// 수신된 통계 요청 수
    pub stats_requests: AtomicU64,
    /// 실패로 응답할 통계 요청 번호 (1부터)
    pub failing_requests: RwLock<HashSet<u64>>,
    /// 이 번호부터의 통계 요청은 모두 실패
    pub fail_from: RwLock<Option<u64>>,
    /// 수신된 앱 생성 요청
    pub created: RwLock<Vec<CreateRecord>>,
}

/// 앱 생성 요청 기록
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRecord {
    pub name: String,
    pub strict_auth: Option<String>,
}

/// 통계 응답 (tinystat 서버 형식)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsResponse {
    apps: u64,
    actions_recorded: u64,
    counts_calculated: u64,
    summaries_calculated: u64,
}

#[derive(Debug, Deserialize)]
struct CreateQuery {
    strict_auth: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateResponse {
    id: String,
    token: String,
}

/// Mock 서버 핸들
pub struct MockServer {
    pub addr: String,
    pub state: Arc<MockServerState>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockServer {
    /// 새 mock 서버 시작 (자동 포트 할당)
    pub async fn start() -> Self {
        let state = Arc::new(MockServerState::default());
        let app = create_router(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("포트 바인딩 실패");
        let port = listener.local_addr().unwrap().port();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .expect("서버 실행 실패");
        });

        Self {
            addr: format!("http://127.0.0.1:{port}"),
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// 서버 주소 반환
    pub fn url(&self) -> &str {
        &self.addr
    }

    /// 통계 요청 수 조회
    pub fn stats_requests(&self) -> u64 {
        self.state.stats_requests.load(Ordering::SeqCst)
    }

    /// 특정 번호의 통계 요청을 503으로 응답
    pub fn fail_request(&self, n: u64) {
        self.state.failing_requests.write().insert(n);
    }

    /// n번째 통계 요청부터 계속 500으로 응답
    pub fn fail_from(&self, n: u64) {
        *self.state.fail_from.write() = Some(n);
    }

    /// 앱 생성 요청 기록
    pub fn created(&self) -> Vec<CreateRecord> {
        self.state.created.read().clone()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// 라우터 생성
fn create_router(state: Arc<MockServerState>) -> Router {
    Router::new()
        .route("/v1/stats", get(handle_stats))
        .route("/v1/app/create/{name}", post(handle_create_app))
        .with_state(state)
}

/// n번째 요청은 모든 카운터가 n * STEP
async fn handle_stats(State(state): State<Arc<MockServerState>>) -> impl IntoResponse {
    let n = state.stats_requests.fetch_add(1, Ordering::SeqCst) + 1;

    if state.failing_requests.read().contains(&n) {
        return (StatusCode::SERVICE_UNAVAILABLE, "maintenance").into_response();
    }
    let fail_from = *state.fail_from.read();
    if fail_from.is_some_and(|from| n >= from) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }

    let value = n * STEP;
    Json(StatsResponse {
        apps: 1,
        actions_recorded: value,
        counts_calculated: value,
        summaries_calculated: value,
    })
    .into_response()
}

async fn handle_create_app(
    State(state): State<Arc<MockServerState>>,
    Path(name): Path<String>,
    Query(query): Query<CreateQuery>,
) -> impl IntoResponse {
    let mut created = state.created.write();
    created.push(CreateRecord {
        name: name.clone(),
        strict_auth: query.strict_auth,
    });
    let n = created.len();

    Json(CreateResponse {
        id: format!("app_{n}"),
        token: format!("tok_{name}_{n}"),
    })
}

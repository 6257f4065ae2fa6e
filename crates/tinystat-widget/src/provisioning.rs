//! 앱 프로비저닝 요청.
//!
//! 폼 제출 → 검증 → `POST /v1/app/create/{name}` → 자격증명 표시.
//! 폴링 루프와 상태를 공유하지 않는다.

use std::sync::Arc;
use tinystat_core::error::CoreError;
use tinystat_core::models::app::{ProvisionForm, ProvisionOutcome};
use tinystat_core::ports::stats_api::StatsApi;
use tinystat_core::ports::surface::{BusyIndicator, CredentialPresenter};
use tracing::{debug, info, warn};

/// 앱 프로비저너
pub struct AppProvisioner {
    api: Arc<dyn StatsApi>,
    busy: Arc<dyn BusyIndicator>,
    presenter: Arc<dyn CredentialPresenter>,
}

impl AppProvisioner {
    /// 새 프로비저너 생성
    pub fn new(
        api: Arc<dyn StatsApi>,
        busy: Arc<dyn BusyIndicator>,
        presenter: Arc<dyn CredentialPresenter>,
    ) -> Self {
        Self {
            api,
            busy,
            presenter,
        }
    }

    /// 폼 제출
    ///
    /// 필수 필드가 비어 있으면 요청 없이 `Skipped`를 반환한다.
    /// 요청이 실패하면 처리 중 표시가 남은 채로 에러를 반환한다.
    pub async fn submit(&self, form: &ProvisionForm) -> Result<ProvisionOutcome, CoreError> {
        if !form.is_complete() {
            debug!("앱 생성 폼 필드 누락, 제출 무시");
            return Ok(ProvisionOutcome::Skipped);
        }

        self.busy.set_busy(true);
        info!(
            "앱 생성 요청: name={}, strict_auth={}",
            form.name,
            form.strict_auth()
        );

        let credentials = match self.api.create_app(&form.name, form.strict_auth()).await {
            Ok(credentials) => credentials,
            Err(e) => {
                // 원래 폼과 같이 실패 시 처리 중 표시는 해제하지 않는다
                warn!("앱 생성 실패: {e}");
                return Err(e);
            }
        };

        self.presenter.present(&credentials);
        self.busy.set_busy(false);
        Ok(ProvisionOutcome::Created(credentials))
    }
}

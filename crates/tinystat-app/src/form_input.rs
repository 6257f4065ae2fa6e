//! 표준 입력 폼 리더.
//!
//! 대시보드 실행 중 `<name> <security>` 한 줄을 앱 생성 폼 제출로 처리한다.
//! 각 제출은 별도 태스크로 진행되어 입력과 폴링을 막지 않으며,
//! 입력이 끝나면 남은 제출을 모두 기다린다.

use std::sync::Arc;
use tinystat_core::models::app::{ProvisionForm, ProvisionOutcome};
use tinystat_widget::provisioning::AppProvisioner;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// 입력 한 줄을 폼으로 변환 (빈 줄은 무시)
///
/// 빠진 필드는 빈 문자열로 두어 검증 단계에서 걸러지게 한다.
pub fn parse_form_line(line: &str) -> Option<ProvisionForm> {
    let mut fields = line.split_whitespace();
    let name = fields.next()?;
    let security = fields.next().unwrap_or_default();
    Some(ProvisionForm::new(name, security))
}

/// 입력이 끝날 때까지 폼 제출 처리
pub async fn run_form_input<R>(provisioner: Arc<AppProvisioner>, reader: R)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut submissions = JoinSet::new();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!("표준 입력 읽기 실패: {e}");
                break;
            }
        };

        let Some(form) = parse_form_line(&line) else {
            continue;
        };

        let provisioner = provisioner.clone();
        submissions.spawn(async move {
            match provisioner.submit(&form).await {
                Ok(ProvisionOutcome::Created(creds)) => debug!("앱 생성 완료: {}", creds.id),
                Ok(ProvisionOutcome::Skipped) => {}
                Err(e) => debug!("앱 생성 제출 실패: {e}"),
            }
        });
    }
    debug!("폼 입력 종료, 남은 제출 {}건 대기", submissions.len());
    while submissions.join_next().await.is_some() {}
}

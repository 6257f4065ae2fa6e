//! 대시보드 라이프사이클.
//!
//! 폴링 태스크 감시, OS 시그널 대기, 종료 순서(신호 발송 → 애니메이션 중단 →
//! 폴링 보고 수거)를 담당한다. 폴링이 먼저 멈춰도 마지막 표시는 시그널까지 유지된다.

use std::future::Future;
use tinystat_widget::animator::TickingAnimator;
use tinystat_widget::scheduler::{ExitReason, PollReport};
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info};

/// 대시보드 라이프사이클 관리자
pub struct DashboardLifecycle {
    shutdown_tx: watch::Sender<bool>,
}

impl DashboardLifecycle {
    pub fn new() -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self { shutdown_tx }
    }

    /// 폴링 루프에 넘길 종료 수신기
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }

    /// SIGINT/SIGTERM까지 대시보드 유지 후 종료
    pub async fn run_until_signal(
        &self,
        poll: JoinHandle<PollReport>,
        animator: &TickingAnimator,
    ) -> Option<PollReport> {
        let signal = async {
            if let Err(e) = wait_for_os_signal().await {
                error!("시그널 핸들러 등록 실패, 즉시 종료: {e}");
            }
        };
        self.supervise(signal, poll, animator).await
    }

    /// `stop`이 끝날 때까지 폴링 태스크를 감시하고 종료 순서 실행
    ///
    /// 폴링 태스크가 패닉하거나 취소되면 `None`.
    pub async fn supervise<F>(
        &self,
        stop: F,
        mut poll: JoinHandle<PollReport>,
        animator: &TickingAnimator,
    ) -> Option<PollReport>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(stop);

        let early = tokio::select! {
            _ = &mut stop => None,
            joined = &mut poll => Some(log_poll_exit(joined)),
        };
        if early.is_some() {
            stop.await;
        }

        info!("종료 신호 발송");
        self.shutdown_tx.send_replace(true);
        animator.cancel_all();

        match early {
            Some(report) => report,
            None => log_poll_exit(poll.await),
        }
    }
}

impl Default for DashboardLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

fn log_poll_exit(joined: Result<PollReport, JoinError>) -> Option<PollReport> {
    match joined {
        Ok(report) => {
            match &report.reason {
                ExitReason::Halted(e) => error!(
                    "폴링 중단 (성공 {}회): {e}. 재시작 전까지 값이 갱신되지 않음",
                    report.cycles
                ),
                ExitReason::Shutdown => info!(
                    "폴링 정상 종료 (성공 {}회, 실패 {}회)",
                    report.cycles, report.failures
                ),
            }
            Some(report)
        }
        Err(e) => {
            error!("폴링 태스크 비정상 종료: {e}");
            None
        }
    }
}

async fn wait_for_os_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;

        tokio::select! {
            _ = sigint.recv() => info!("SIGINT 수신"),
            _ = sigterm.recv() => info!("SIGTERM 수신"),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        info!("Ctrl+C 수신");
    }

    Ok(())
}

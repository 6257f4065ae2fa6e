//! # tinystat-app
//!
//! tinystat 대시보드 바이너리 진입점.
//! 설정 로드, 어댑터 조립, 폴링 루프와 폼 입력 오케스트레이션.

mod form_input;
mod lifecycle;
mod terminal;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use tinystat_core::config::{AppConfig, FailurePolicy};
use tinystat_core::config_manager::ConfigManager;
use tinystat_core::models::app::{ProvisionForm, ProvisionOutcome};
use tinystat_network::http_client::HttpStatsClient;
use tinystat_widget::animator::TickingAnimator;
use tinystat_widget::provisioning::AppProvisioner;
use tinystat_widget::reconciler::SnapshotReconciler;
use tinystat_widget::scheduler::{PollScheduler, SchedulerConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::lifecycle::DashboardLifecycle;
use crate::terminal::{TerminalBusy, TerminalPresenter, TerminalSurface};

/// tinystat 라이브 통계 대시보드
#[derive(Parser, Debug)]
#[command(name = "tinystat")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// 서버 URL 지정 (기본: http://localhost:8080)
    #[arg(long, short = 's', global = true)]
    server: Option<String>,

    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info", global = true)]
    log_level: String,

    /// 로그 출력 형식
    #[arg(long, value_enum, global = true)]
    log_format: Option<LogFormat>,

    /// 폴링 주기 (밀리초)
    #[arg(long, global = true)]
    poll_interval_ms: Option<u64>,

    /// 조회 실패 후에도 백오프하며 폴링 계속
    #[arg(long, global = true)]
    retry: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 카운터를 폴링하며 표시 (기본). 표준 입력 `<name> <security>` 줄로 앱 생성
    Watch,
    /// 앱 하나를 생성하고 자격증명 출력
    CreateApp {
        /// 앱 이름
        #[arg(long)]
        name: String,
        /// 보안 모드 (`true`면 strict_auth)
        #[arg(long, default_value = "false")]
        security: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

/// 로그 형식 결정 (지정 없으면 ENVIRONMENT에 prod가 들어 있을 때 JSON)
fn resolve_log_format(requested: Option<LogFormat>, environment: Option<&str>) -> LogFormat {
    match requested {
        Some(format) => format,
        None if environment.is_some_and(|env| env.to_lowercase().contains("prod")) => {
            LogFormat::Json
        }
        None => LogFormat::Text,
    }
}

/// tracing 초기화. 표준 출력은 카운터 표시용이므로 로그는 stderr로 보낸다.
fn init_tracing(args: &Args) {
    let level = &args.log_level;
    let log_filter = format!(
        "tinystat={level},tinystat_core={level},tinystat_network={level},tinystat_widget={level}"
    );
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter));
    let environment = std::env::var("ENVIRONMENT").ok();

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match resolve_log_format(args.log_format, environment.as_deref()) {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

/// 설정 로드: 파일 → 환경변수 → CLI 인자 순으로 덮어쓴 뒤 검증
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => ConfigManager::with_path(path.clone())
            .with_context(|| format!("설정 파일 로드 실패: {}", path.display()))?
            .get(),
        None => match ConfigManager::new() {
            Ok(manager) => {
                info!("설정 파일: {:?}", manager.config_path());
                manager.get()
            }
            Err(e) => {
                warn!("설정 관리자 초기화 실패, 기본 설정 사용: {e}");
                AppConfig::default_config()
            }
        },
    };

    config.apply_env_overrides()?;
    apply_cli_overrides(&mut config, args);
    config.validate()?;
    Ok(config)
}

fn apply_cli_overrides(config: &mut AppConfig, args: &Args) {
    if let Some(server) = &args.server {
        config.server.base_url = server.clone();
    }
    if let Some(interval) = args.poll_interval_ms {
        config.poll.interval_ms = interval;
    }
    if args.retry {
        config.poll.failure_policy = FailurePolicy::Retry;
    }
}

fn build_client(config: &AppConfig) -> Result<Arc<HttpStatsClient>> {
    let client = HttpStatsClient::new(&config.server.base_url, config.request_timeout())?
        .with_max_retries(config.server.max_retries);
    Ok(Arc::new(client))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args);

    let config = load_config(&args)?;
    let client = build_client(&config)?;

    match args.command {
        Some(Command::CreateApp { name, security }) => create_app(client, name, security).await,
        Some(Command::Watch) | None => watch(config, client).await,
    }
}

/// 앱 하나 생성 후 종료
async fn create_app(client: Arc<HttpStatsClient>, name: String, security: String) -> Result<()> {
    let provisioner = AppProvisioner::new(
        client,
        Arc::new(TerminalBusy::default()),
        Arc::new(TerminalPresenter),
    );

    match provisioner.submit(&ProvisionForm::new(name, security)).await? {
        ProvisionOutcome::Created(_) => Ok(()),
        ProvisionOutcome::Skipped => {
            warn!("앱 이름과 보안 모드가 모두 필요함");
            Ok(())
        }
    }
}

/// 대시보드 실행: 폴링 루프 + 표준 입력 폼, 시그널까지 유지
async fn watch(config: AppConfig, client: Arc<HttpStatsClient>) -> Result<()> {
    info!("tinystat 대시보드 시작: 서버={}", client.base_url());

    let lifecycle = DashboardLifecycle::new();

    let surface = Arc::new(TerminalSurface::new(std::io::stdout().is_terminal()));
    let animator = Arc::new(TickingAnimator::new(
        surface,
        config.animation.frame_interval(),
    ));
    let reconciler = SnapshotReconciler::new(animator.clone(), config.animation.clone());
    let scheduler = PollScheduler::new(SchedulerConfig::from(&config), client.clone(), reconciler);
    let poll_handle = scheduler.spawn(lifecycle.subscribe());

    let provisioner = Arc::new(AppProvisioner::new(
        client,
        Arc::new(TerminalBusy::default()),
        Arc::new(TerminalPresenter),
    ));
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    tokio::spawn(form_input::run_form_input(provisioner, stdin));

    lifecycle.run_until_signal(poll_handle, &animator).await;
    println!();
    info!("tinystat 대시보드 종료");
    Ok(())
}

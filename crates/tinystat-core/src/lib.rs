//! # tinystat-core
//!
//! tinystat 대시보드 도메인 모델, 포트(trait) 정의, 에러 타입.
//! 모든 크레이트가 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`]: 통계 스냅샷, 애니메이션 요청, 앱 프로비저닝 모델 (serde)
//! - [`ports`]: Hexagonal Architecture 포트 인터페이스
//! - [`error`]: 핵심 에러 타입 (thiserror)
//! - [`config`]: 애플리케이션 설정 구조체
//! - [`config_manager`]: 설정 파일 관리 (로드/저장)

pub mod config;
pub mod config_manager;
pub mod error;
pub mod models;
pub mod ports;

//! tinystat 도메인 모델.
//!
//! 서버 응답과 화면 표시 사이에서 공유하는 데이터 구조체를 정의한다.

pub mod animation;
pub mod app;
pub mod stats;

//! 포트 인터페이스 (trait).
//!
//! Hexagonal Architecture의 포트 레이어.
//! 각 어댑터 crate가 이 trait들을 구현하며,
//! `tinystat-app`에서 `Arc<dyn T>`로 와이어링한다.
//!
//! 네트워크 포트는 `async_trait`으로 object safety를 보장하고,
//! 화면 포트는 이벤트 루프를 막지 않는 동기 호출만 둔다.

pub mod animator;
pub mod stats_api;
pub mod surface;

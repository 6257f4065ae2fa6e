//! 화면 표시 포트.
//!
//! 구현: `tinystat-app` crate (터미널 렌더러)

use crate::error::CoreError;
use crate::models::app::AppCredentials;

/// 요소 ID로 텍스트를 갱신할 수 있는 표시 영역
pub trait CounterSurface: Send + Sync {
    /// 요소 존재 여부
    fn has_element(&self, element_id: &str) -> bool;

    /// 요소 텍스트 갱신
    fn set_text(&self, element_id: &str, text: &str) -> Result<(), CoreError>;
}

/// 제출 버튼의 "처리 중" 표시
pub trait BusyIndicator: Send + Sync {
    /// 처리 중 상태 설정/해제
    fn set_busy(&self, busy: bool);

    /// 현재 처리 중 여부
    fn is_busy(&self) -> bool;
}

/// 발급된 자격증명을 운영자에게 보여주는 창구
pub trait CredentialPresenter: Send + Sync {
    /// 앱 ID와 토큰 표시
    fn present(&self, credentials: &AppCredentials);
}

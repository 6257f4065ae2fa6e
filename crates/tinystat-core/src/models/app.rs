//! 앱 프로비저닝 모델.
//!
//! 운영자가 제출하는 생성 폼과 서버가 돌려주는 자격증명.

use serde::{Deserialize, Serialize};

/// 앱 생성 폼 (`app-name`, `app-security` 필드)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisionForm {
    /// 앱 이름
    pub name: String,
    /// 보안 모드 문자열 ("true"일 때만 strict auth)
    pub security_mode: String,
}

impl ProvisionForm {
    /// 새 폼 생성
    pub fn new(name: impl Into<String>, security_mode: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            security_mode: security_mode.into(),
        }
    }

    /// 두 필수 필드가 모두 채워졌는지
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.security_mode.is_empty()
    }

    /// strict auth 요청 여부 (정확히 "true"일 때만)
    pub fn strict_auth(&self) -> bool {
        self.security_mode == "true"
    }
}

/// 앱 생성 응답
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppCredentials {
    /// 앱 ID
    pub id: String,
    /// 앱 토큰
    pub token: String,
}

/// 프로비저닝 제출 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// 필수 필드 누락: 요청 없이 무시됨
    Skipped,
    /// 생성 성공
    Created(AppCredentials),
}

//! 公司邮箱验证码的状态与校验规则
//!
//! 验证码与过期时间总是成对出现，用 `Option<PendingCode>` 表示；
//! 校验结果用 `VerificationError` 区分三种可恢复的失败。

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// 验证码有效期（分钟）
pub const CODE_TTL_MINUTES: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCode {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

impl PendingCode {
    pub fn new(code: String, issued_at: DateTime<Utc>) -> Self {
        Self {
            code,
            expires_at: issued_at + Duration::minutes(CODE_TTL_MINUTES),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VerificationState {
    pub pending: Option<PendingCode>,
    pub is_verified: bool,
    pub verified_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("No active code. Please request a new verification code.")]
    NoActiveCode,
    #[error("Code expired. Please request a new verification code.")]
    Expired,
    #[error("Invalid code. Please try again.")]
    InvalidCode,
}

impl VerificationError {
    pub fn error_code(&self) -> &'static str {
        match self {
            VerificationError::NoActiveCode => "NO_ACTIVE_CODE",
            VerificationError::Expired => "CODE_EXPIRED",
            VerificationError::InvalidCode => "INVALID_CODE",
        }
    }
}

impl VerificationState {
    /// 写入新验证码，覆盖之前未使用的验证码，并重置为未验证
    pub fn issue(&mut self, code: String, now: DateTime<Utc>) -> &PendingCode {
        self.is_verified = false;
        self.pending.insert(PendingCode::new(code, now))
    }

    /// 校验提交的验证码。
    ///
    /// 过期的验证码不会被清除，直到重新签发时被覆盖。
    pub fn check(&mut self, submitted: &str, now: DateTime<Utc>) -> Result<(), VerificationError> {
        let pending = self
            .pending
            .as_ref()
            .ok_or(VerificationError::NoActiveCode)?;

        if pending.is_expired(now) {
            return Err(VerificationError::Expired);
        }
        if pending.code != submitted {
            return Err(VerificationError::InvalidCode);
        }

        self.pending = None;
        self.is_verified = true;
        self.verified_at = Some(now);
        Ok(())
    }
}

/// 验证码邮件的投递结果
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EmailStatus {
    Sent,
    SendFailed,
    NoEmail,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SendCodeRequest {
    /// 可选：使用新的联系邮箱接收验证码
    #[schema(example = "hr@acme.com")]
    pub verification_email: Option<String>,
    pub next: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SendCodeResponse {
    pub email_status: EmailStatus,
    pub recipient: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub redirect_to: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VerifyCodeRequest {
    #[schema(example = "482193")]
    pub code: String,
    pub next: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VerifyCodeResponse {
    pub verified: bool,
    pub verified_at: DateTime<Utc>,
    pub redirect_to: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VerificationStatusResponse {
    pub company_name: String,
    pub slug: String,
    pub contact_email: Option<String>,
    pub is_verified: bool,
    pub verified_at: Option<DateTime<Utc>>,
    pub has_active_code: bool,
    pub ttl_minutes: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyEntryQuery {
    pub next: Option<String>,
    pub just_registered: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VerifyEntryResponse {
    pub slug: String,
    pub redirect_to: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 1, 12, 0, 0).unwrap()
    }

    fn issued(code: &str) -> VerificationState {
        let mut state = VerificationState::default();
        state.issue(code.to_string(), t0());
        state
    }

    #[test]
    fn test_issue_sets_expiry_ten_minutes_ahead() {
        let state = issued("482193");
        let pending = state.pending.as_ref().unwrap();
        assert_eq!(pending.code, "482193");
        assert_eq!(pending.expires_at, t0() + Duration::minutes(10));
        assert!(!state.is_verified);
    }

    #[test]
    fn test_issue_resets_verified_flag() {
        let mut state = issued("482193");
        state.check("482193", t0()).unwrap();
        assert!(state.is_verified);

        state.issue("111111".to_string(), t0() + Duration::hours(1));
        assert!(!state.is_verified);
        assert!(state.pending.is_some());
    }

    #[test]
    fn test_check_succeeds_once() {
        let mut state = issued("482193");
        let at = t0() + Duration::minutes(9) + Duration::seconds(59);

        assert_eq!(state.check("482193", at), Ok(()));
        assert!(state.is_verified);
        assert_eq!(state.verified_at, Some(at));
        assert!(state.pending.is_none());

        let later = t0() + Duration::minutes(10) + Duration::seconds(1);
        assert_eq!(
            state.check("482193", later),
            Err(VerificationError::NoActiveCode)
        );
        // 失败不影响已验证状态
        assert!(state.is_verified);
    }

    #[test]
    fn test_check_without_code() {
        let mut state = VerificationState::default();
        assert_eq!(
            state.check("000000", t0()),
            Err(VerificationError::NoActiveCode)
        );
    }

    #[test]
    fn test_mismatch_keeps_code() {
        let mut state = issued("482193");
        let before = state.clone();

        assert_eq!(
            state.check("482194", t0() + Duration::minutes(1)),
            Err(VerificationError::InvalidCode)
        );
        assert_eq!(state, before);

        assert_eq!(state.check("482193", t0() + Duration::minutes(2)), Ok(()));
    }

    #[test]
    fn test_expired_regardless_of_code() {
        let mut state = issued("482193");
        let after = t0() + Duration::minutes(10) + Duration::seconds(1);

        assert_eq!(state.check("482193", after), Err(VerificationError::Expired));
        assert_eq!(state.check("000000", after), Err(VerificationError::Expired));
        // 过期验证码保留在记录中
        assert!(state.pending.is_some());
        assert!(!state.is_verified);
    }

    #[test]
    fn test_boundary_is_still_valid() {
        let mut state = issued("482193");
        assert_eq!(state.check("482193", t0() + Duration::minutes(10)), Ok(()));
    }

    #[test]
    fn test_reissue_invalidates_previous_code() {
        let mut state = issued("482193");
        state.issue("730015".to_string(), t0() + Duration::minutes(1));

        let at = t0() + Duration::minutes(2);
        assert_eq!(state.check("482193", at), Err(VerificationError::InvalidCode));
        assert_eq!(state.check("730015", at), Ok(()));
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(VerificationError::NoActiveCode.error_code(), "NO_ACTIVE_CODE");
        assert_eq!(VerificationError::Expired.error_code(), "CODE_EXPIRED");
        assert_eq!(VerificationError::InvalidCode.error_code(), "INVALID_CODE");
    }
}

use crate::models::{PendingCode, VerificationState};
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "companies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub user_id: Option<i64>,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub industry: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub about: Option<String>,
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    // 邮箱验证
    pub contact_email: Option<String>,
    pub is_verified: bool,
    pub verification_code: Option<String>,
    pub verification_expires_at: Option<DateTime<Utc>>,
    pub verified_at: Option<DateTime<Utc>>,
}

impl Model {
    /// 读取验证状态；验证码与过期时间缺一即视为没有待验证的验证码
    pub fn verification_state(&self) -> VerificationState {
        let pending = match (&self.verification_code, self.verification_expires_at) {
            (Some(code), Some(expires_at)) => Some(PendingCode {
                code: code.clone(),
                expires_at,
            }),
            _ => None,
        };
        VerificationState {
            pending,
            is_verified: self.is_verified,
            verified_at: self.verified_at,
        }
    }
}

impl ActiveModel {
    /// 成对写入验证码与过期时间
    pub fn set_verification_state(&mut self, state: &VerificationState) {
        let (code, expires_at) = match &state.pending {
            Some(p) => (Some(p.code.clone()), Some(p.expires_at)),
            None => (None, None),
        };
        self.verification_code = Set(code);
        self.verification_expires_at = Set(expires_at);
        self.is_verified = Set(state.is_verified);
        self.verified_at = Set(state.verified_at);
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

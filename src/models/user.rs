use crate::entities::{UserRole, user_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "ayse")]
    pub username: String,
    #[schema(example = "ayse@uni.edu")]
    pub email: String,
    #[schema(example = "Password123")]
    pub password: String,
    #[schema(example = "Password123")]
    pub password_confirm: String,
    /// student / company / recruiter
    #[schema(example = "student")]
    pub user_type: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "ayse@uni.edu")]
    pub email: String,
    #[schema(example = "Password123")]
    pub password: String,
    #[schema(example = "student")]
    pub user_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl From<user_entity::Model> for UserResponse {
    fn from(user: user_entity::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            created_at: user.created_at.unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserResponse,
    #[serde(flatten)]
    pub tokens: AuthTokens,
    /// 登录后前端应跳转的位置
    pub redirect_to: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    pub user: UserResponse,
    /// 公司账号注册后自动登录；学生账号需要再登录
    pub tokens: Option<AuthTokens>,
    /// 公司账号：验证码邮件的投递结果
    pub email_status: Option<crate::models::EmailStatus>,
    pub redirect_to: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GoogleStartQuery {
    pub user_type: Option<String>,
    pub next: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GoogleStartResponse {
    pub authorization_url: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GoogleCallbackQuery {
    pub code: String,
    pub state: String,
}

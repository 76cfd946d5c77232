use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[sea_orm(string_value = "student")]
    Student,
    #[sea_orm(string_value = "company")]
    Company,
}

impl UserRole {
    /// 解析表单中的 user_type，recruiter 视同 company
    pub fn from_user_type(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "student" => Some(UserRole::Student),
            "company" | "recruiter" => Some(UserRole::Company),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => "student",
            UserRole::Company => "company",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub username: String,
    /// 存储时统一小写
    #[sea_orm(unique)]
    pub email: String,
    /// OAuth 注册的账号没有密码
    pub password_hash: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Model {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_user_type() {
        assert_eq!(UserRole::from_user_type("student"), Some(UserRole::Student));
        assert_eq!(UserRole::from_user_type(" Company "), Some(UserRole::Company));
        assert_eq!(UserRole::from_user_type("recruiter"), Some(UserRole::Company));
        assert_eq!(UserRole::from_user_type(""), None);
        assert_eq!(UserRole::from_user_type("admin"), None);
    }
}

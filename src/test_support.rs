//! 测试用的内存数据库与可观测的邮件桩

use crate::entities::{UserRole, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::external::{Mailer, OutgoingEmail};
use async_trait::async_trait;
use chrono::Utc;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use std::sync::Mutex;

/// 建一个跑完全部迁移的 SQLite 内存库（单连接，保证同一个库）
pub async fn setup_db() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:".to_owned());
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.expect("connect sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    db
}

pub async fn create_user(
    db: &DatabaseConnection,
    username: &str,
    email: &str,
    role: UserRole,
) -> users::Model {
    users::ActiveModel {
        username: Set(username.to_string()),
        email: Set(email.to_string()),
        password_hash: Set(None),
        first_name: Set(String::new()),
        last_name: Set(String::new()),
        role: Set(role),
        created_at: Set(Some(Utc::now())),
        updated_at: Set(Some(Utc::now())),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert user")
}

#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().expect("mailer lock").clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: OutgoingEmail) -> AppResult<()> {
        if self.fail {
            return Err(AppError::MailError("connection refused".into()));
        }
        self.sent.lock().expect("mailer lock").push(email);
        Ok(())
    }
}

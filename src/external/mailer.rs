use crate::config::{MailBackend, SmtpConfig};
use crate::error::{AppError, AppResult};
use crate::utils::{verification_bodies, verification_subject};
use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

impl OutgoingEmail {
    pub fn company_verification(to: &str, code: &str, company_name: Option<&str>) -> Self {
        let (text_body, html_body) = verification_bodies(code, company_name);
        Self {
            to: to.to_string(),
            subject: verification_subject(company_name),
            text_body,
            html_body,
        }
    }
}

/// 邮件投递接口
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> AppResult<()>;
}

pub type SharedMailer = Arc<dyn Mailer>;

pub fn build_mailer(config: &SmtpConfig) -> AppResult<SharedMailer> {
    match config.backend {
        MailBackend::Smtp => Ok(Arc::new(SmtpMailer::new(config)?)),
        MailBackend::Console => Ok(Arc::new(ConsoleMailer::new(&config.from_email))),
    }
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> AppResult<Self> {
        let builder = if config.use_ssl {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                .map_err(|e| AppError::ConfigError(format!("Invalid SMTP relay: {e}")))?
        } else if config.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .map_err(|e| AppError::ConfigError(format!("Invalid SMTP relay: {e}")))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
        };

        let mut builder = builder
            .port(config.port)
            .timeout(Some(Duration::from_secs(config.timeout_secs)));
        if !config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }

        let from = config
            .from_email
            .parse::<Mailbox>()
            .map_err(|e| AppError::ConfigError(format!("Invalid from address: {e}")))?;

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> AppResult<()> {
        let to = email
            .to
            .parse::<Mailbox>()
            .map_err(|e| AppError::MailError(format!("Invalid recipient {}: {e}", email.to)))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject)
            .multipart(MultiPart::alternative_plain_html(
                email.text_body,
                email.html_body,
            ))
            .map_err(|e| AppError::MailError(format!("Failed to build message: {e}")))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AppError::MailError(format!("SMTP delivery failed: {e}")))?;

        log::info!("Email sent to {}", email.to);
        Ok(())
    }
}

/// 只把邮件内容写进日志
pub struct ConsoleMailer {
    from: String,
}

impl ConsoleMailer {
    pub fn new(from: &str) -> Self {
        Self {
            from: from.to_string(),
        }
    }
}

#[async_trait]
impl Mailer for ConsoleMailer {
    async fn send(&self, email: OutgoingEmail) -> AppResult<()> {
        log::info!(
            "Console mail from {} to {}: {}\n{}",
            self.from,
            email.to,
            email.subject,
            email.text_body
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_verification_email() {
        let email = OutgoingEmail::company_verification("hr@acme.com", "123456", Some("Acme"));
        assert_eq!(email.to, "hr@acme.com");
        assert_eq!(email.subject, "lazyIntern | Company email verification - Acme");
        assert!(email.text_body.contains("123456"));
        assert!(email.html_body.contains("123456"));
    }

    #[tokio::test]
    async fn test_console_mailer_accepts_everything() {
        let mailer = ConsoleMailer::new("no-reply@lazyintern.local");
        let email = OutgoingEmail::company_verification("hr@acme.com", "123456", None);
        assert!(mailer.send(email).await.is_ok());
    }

    #[tokio::test]
    async fn test_build_smtp_mailer_rejects_bad_from() {
        let config = SmtpConfig {
            from_email: "not an address".to_string(),
            ..SmtpConfig::default()
        };
        assert!(SmtpMailer::new(&config).is_err());
    }
}

use crate::entities::{company_entity as companies, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::external::{OutgoingEmail, SharedMailer};
use crate::models::*;
use crate::services::CompanyService;
use crate::utils::{
    company_profile_path, company_verify_path, generate_six_digit_code, normalize_non_empty,
    validate_email, with_query,
};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Set};

/// 一次签发的结果
#[derive(Debug, Clone)]
pub struct IssuedCode {
    pub company: companies::Model,
    pub recipient: Option<String>,
    pub email_status: EmailStatus,
    pub expires_at: DateTime<Utc>,
}

/// 公司邮箱验证：签发验证码、校验验证码
#[derive(Clone)]
pub struct VerificationService {
    pool: DatabaseConnection,
    mailer: SharedMailer,
    company_service: CompanyService,
    success_redirect: String,
}

impl VerificationService {
    pub fn new(
        pool: DatabaseConnection,
        mailer: SharedMailer,
        company_service: CompanyService,
        success_redirect: String,
    ) -> Self {
        Self {
            pool,
            mailer,
            company_service,
            success_redirect,
        }
    }

    pub async fn issue_code(&self, company: companies::Model) -> AppResult<IssuedCode> {
        self.issue_code_at(company, Utc::now()).await
    }

    /// 签发新验证码并尝试发送邮件。
    ///
    /// 验证码先落库，邮件发送失败只体现在 `email_status` 上，不回滚。
    pub async fn issue_code_at(
        &self,
        company: companies::Model,
        now: DateTime<Utc>,
    ) -> AppResult<IssuedCode> {
        // 联系邮箱为空时用账号邮箱补上
        let has_contact = company.contact_email.as_deref().is_some_and(|e| !e.is_empty());
        let owner_email = match company.user_id {
            Some(user_id) if !has_contact => users::Entity::find_by_id(user_id)
                .one(&self.pool)
                .await?
                .map(|u| u.email)
                .filter(|e| !e.is_empty()),
            _ => None,
        };
        let recipient = company
            .contact_email
            .clone()
            .filter(|e| !e.is_empty())
            .or(owner_email.clone());

        let mut state = company.verification_state();
        let code = generate_six_digit_code();
        let expires_at = state.issue(code.clone(), now).expires_at;

        let company_name = company.name.clone();
        let mut model = company.into_active_model();
        if let Some(email) = owner_email {
            model.contact_email = Set(Some(email));
        }
        model.set_verification_state(&state);
        let company = model.update(&self.pool).await?;

        log::info!(
            "Issued verification code for company {} (expires at {})",
            company.slug,
            expires_at
        );

        let email_status = match &recipient {
            None => {
                log::warn!("Company {} has no contact email, code not sent", company.slug);
                EmailStatus::NoEmail
            }
            Some(to) => {
                let email = OutgoingEmail::company_verification(to, &code, Some(&company_name));
                match self.mailer.send(email).await {
                    Ok(()) => EmailStatus::Sent,
                    Err(e) => {
                        log::error!(
                            "Failed to send verification email for company {}: {e}",
                            company.slug
                        );
                        EmailStatus::SendFailed
                    }
                }
            }
        };

        Ok(IssuedCode {
            company,
            recipient,
            email_status,
            expires_at,
        })
    }

    /// 重新发送验证码，可同时更换联系邮箱
    pub async fn resend_code(
        &self,
        user_id: i64,
        slug: &str,
        request: SendCodeRequest,
    ) -> AppResult<SendCodeResponse> {
        let mut company = self.company_service.find_owned(user_id, slug).await?;

        if let Some(email) = normalize_non_empty(request.verification_email.as_deref()) {
            let email = email.to_lowercase();
            validate_email(&email)?;
            if company.contact_email.as_deref() != Some(email.as_str()) {
                let mut model = company.into_active_model();
                model.contact_email = Set(Some(email));
                company = model.update(&self.pool).await?;
            }
        }

        let issued = self.issue_code(company).await?;
        let slug = issued.company.slug.clone();
        let next = normalize_non_empty(request.next.as_deref());

        let redirect_to = match issued.email_status {
            EmailStatus::NoEmail => {
                with_query(&company_profile_path(&slug), &[("msg", "no_email")])
            }
            status => {
                let mut params = vec![match status {
                    EmailStatus::Sent => ("sent", "1"),
                    _ => ("error", "send_failed"),
                }];
                if let Some(next) = next.as_deref() {
                    params.push(("next", next));
                }
                with_query(&company_verify_path(&slug), &params)
            }
        };

        Ok(SendCodeResponse {
            email_status: issued.email_status,
            recipient: issued.recipient,
            expires_at: issued.expires_at,
            redirect_to,
        })
    }

    pub async fn verify_code(
        &self,
        user_id: i64,
        slug: &str,
        request: VerifyCodeRequest,
    ) -> AppResult<VerifyCodeResponse> {
        self.verify_code_at(user_id, slug, request, Utc::now()).await
    }

    pub async fn verify_code_at(
        &self,
        user_id: i64,
        slug: &str,
        request: VerifyCodeRequest,
        now: DateTime<Utc>,
    ) -> AppResult<VerifyCodeResponse> {
        let company = self.company_service.find_owned(user_id, slug).await?;

        let mut state = company.verification_state();
        state
            .check(request.code.trim(), now)
            .map_err(AppError::Verification)?;

        let mut model = company.into_active_model();
        model.set_verification_state(&state);
        let company = model.update(&self.pool).await?;

        log::info!("Company {} verified its email", company.slug);

        let redirect_to = normalize_non_empty(request.next.as_deref())
            .unwrap_or_else(|| self.success_redirect.clone());

        Ok(VerifyCodeResponse {
            verified: true,
            verified_at: company.verified_at.unwrap_or(now),
            redirect_to,
        })
    }

    pub async fn status(&self, user_id: i64, slug: &str) -> AppResult<VerificationStatusResponse> {
        let company = self.company_service.find_owned(user_id, slug).await?;
        let state = company.verification_state();
        Ok(VerificationStatusResponse {
            company_name: company.name,
            slug: company.slug,
            contact_email: company.contact_email,
            is_verified: state.is_verified,
            verified_at: state.verified_at,
            has_active_code: state.pending.is_some(),
            ttl_minutes: CODE_TTL_MINUTES,
        })
    }

    /// 入口：确保当前用户有公司记录，返回带 slug 的验证地址
    pub async fn entry(
        &self,
        user: &users::Model,
        query: VerifyEntryQuery,
    ) -> AppResult<VerifyEntryResponse> {
        let company = self.company_service.ensure_company_for_user(user).await?;

        let next = normalize_non_empty(query.next.as_deref());
        let just_registered = normalize_non_empty(query.just_registered.as_deref());
        let mut params = Vec::new();
        if let Some(next) = next.as_deref() {
            params.push(("next", next));
        }
        if let Some(jr) = just_registered.as_deref() {
            params.push(("just_registered", jr));
        }

        Ok(VerifyEntryResponse {
            redirect_to: with_query(&company_verify_path(&company.slug), &params),
            slug: company.slug,
        })
    }
}

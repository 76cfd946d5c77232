use crate::entities::{UserRole, oauth_account_entity as oauth_accounts, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::external::{GoogleOAuthService, GoogleUserInfo};
use crate::models::*;
use crate::services::{CompanyService, ProfileService, VerificationService};
use crate::utils::*;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};

const GOOGLE_PROVIDER: &str = "google";
const USERNAME_MAX_LEN: usize = 150;

#[derive(Clone)]
pub struct AuthService {
    pool: DatabaseConnection,
    jwt_service: JwtService,
    google: GoogleOAuthService,
    company_service: CompanyService,
    profile_service: ProfileService,
    verification_service: VerificationService,
}

impl AuthService {
    pub fn new(
        pool: DatabaseConnection,
        jwt_service: JwtService,
        google: GoogleOAuthService,
        company_service: CompanyService,
        profile_service: ProfileService,
        verification_service: VerificationService,
    ) -> Self {
        Self {
            pool,
            jwt_service,
            google,
            company_service,
            profile_service,
            verification_service,
        }
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<RegisterResponse> {
        let username = request.username.trim().to_string();
        let email = request.email.trim().to_lowercase();

        // 表单校验，错误一起返回
        let mut errors: Vec<String> = Vec::new();
        if !is_valid_username(&username) {
            errors.push(
                "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters."
                    .to_string(),
            );
        } else if self.username_taken(&username).await? {
            errors.push("A user with that username already exists.".to_string());
        }
        if !is_valid_email(&email) {
            errors.push("Enter a valid email address.".to_string());
        } else if self.find_by_email(&email).await?.is_some() {
            errors.push("A user with that email already exists.".to_string());
        }
        if request.password != request.password_confirm {
            errors.push("The two password fields didn't match.".to_string());
        } else if let Err(AppError::ValidationError(msg)) = validate_password(
            &request.password,
            &[("username", username.as_str()), ("email address", email.as_str())],
        ) {
            errors.push(msg);
        }
        if !errors.is_empty() {
            return Err(AppError::ValidationError(errors.join(" ")));
        }

        let role = request
            .user_type
            .as_deref()
            .and_then(UserRole::from_user_type);
        let password_hash = hash_password(&request.password)?;
        let user = users::ActiveModel {
            username: Set(username),
            email: Set(email),
            password_hash: Set(Some(password_hash)),
            first_name: Set(String::new()),
            last_name: Set(String::new()),
            role: Set(role.unwrap_or(UserRole::Student)),
            created_at: Set(Some(Utc::now())),
            updated_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("Registered user {} as {:?}", user.id, role);

        match role {
            Some(UserRole::Company) => {
                let company = self.company_service.ensure_company_for_user(&user).await?;
                let tokens = self.issue_tokens(&user)?;
                let issued = self.verification_service.issue_code(company).await?;
                Ok(RegisterResponse {
                    redirect_to: with_query(
                        &company_verify_path(&issued.company.slug),
                        &[("just_registered", "1")],
                    ),
                    user: user.into(),
                    tokens: Some(tokens),
                    email_status: Some(issued.email_status),
                })
            }
            Some(UserRole::Student) => {
                self.profile_service.ensure_profile(user.id).await?;
                Ok(RegisterResponse {
                    user: user.into(),
                    tokens: None,
                    email_status: None,
                    redirect_to: login_path(),
                })
            }
            // 未选择角色：只建账号
            None => Ok(RegisterResponse {
                user: user.into(),
                tokens: None,
                email_status: None,
                redirect_to: login_path(),
            }),
        }
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        let user_type = normalize_non_empty(request.user_type.as_deref()).ok_or_else(|| {
            AppError::ValidationError("Please select a user type.".to_string())
        })?;
        let wanted = UserRole::from_user_type(&user_type).ok_or_else(|| {
            AppError::ValidationError("Please select a valid user type.".to_string())
        })?;

        let invalid = || AppError::AuthError("Invalid email or password.".to_string());
        let user = self
            .find_by_email(&request.email.trim().to_lowercase())
            .await?
            .ok_or_else(invalid)?;

        let is_company = user.role == UserRole::Company
            || self.company_service.find_by_user(user.id).await?.is_some();
        match (wanted, is_company) {
            (UserRole::Student, true) => {
                return Err(AppError::AuthError(
                    "This is a company account; cannot log in as 'Student'.".to_string(),
                ));
            }
            (UserRole::Company, false) => {
                return Err(AppError::AuthError(
                    "This is a student account; cannot log in as 'Company/Recruiter'.".to_string(),
                ));
            }
            _ => {}
        }

        let hash = user.password_hash.as_deref().ok_or_else(invalid)?;
        if !verify_password(&request.password, hash)? {
            return Err(invalid());
        }

        let redirect_to = self.landing_path(&user).await?;
        Ok(AuthResponse {
            tokens: self.issue_tokens(&user)?,
            user: user.into(),
            redirect_to,
        })
    }

    pub async fn refresh_token(&self, refresh_token: &str) -> AppResult<AuthResponse> {
        let claims = self.jwt_service.verify_refresh_token(refresh_token)?;
        let user_id: i64 = claims
            .sub
            .parse()
            .map_err(|_| AppError::AuthError("Invalid token".to_string()))?;

        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("User no longer exists".to_string()))?;

        let access_token =
            self.jwt_service
                .generate_access_token(user.id, &user.username, user.role)?;
        let redirect_to = self.profile_service.redirect_for(&user).await?.redirect_to;

        Ok(AuthResponse {
            user: user.into(),
            tokens: AuthTokens {
                access_token,
                refresh_token: refresh_token.to_string(),
                expires_in: self.jwt_service.get_access_token_expires_in(),
            },
            redirect_to,
        })
    }

    /// 生成 Google 授权地址，角色与回跳地址放进签名的 state
    pub fn google_start(&self, query: GoogleStartQuery) -> AppResult<GoogleStartResponse> {
        let role = query
            .user_type
            .as_deref()
            .and_then(UserRole::from_user_type)
            .unwrap_or(UserRole::Student);
        let next = normalize_non_empty(query.next.as_deref());
        let state = self.jwt_service.generate_oauth_state(role, next)?;
        Ok(GoogleStartResponse {
            authorization_url: self.google.authorization_url(&state)?,
        })
    }

    pub async fn google_callback(&self, query: GoogleCallbackQuery) -> AppResult<AuthResponse> {
        let state = self.jwt_service.verify_oauth_state(&query.state)?;
        let token = self.google.exchange_code(&query.code).await?;
        let info = self.google.fetch_user(&token.access_token).await?;
        self.complete_google_login(info, state.role, state.next).await
    }

    /// Google 账号登录：已绑定直接登录，邮箱已存在则绑定，否则自动注册
    pub async fn complete_google_login(
        &self,
        info: GoogleUserInfo,
        role: UserRole,
        next: Option<String>,
    ) -> AppResult<AuthResponse> {
        if let Some(user) = self.find_linked_user(&info.sub).await? {
            log::info!("Google login for user {}", user.id);
            return self.finish_login(user, next).await;
        }

        let email = info
            .email
            .as_deref()
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .ok_or_else(|| {
                AppError::AuthError("Google account has no email address".to_string())
            })?;

        if let Some(user) = self.find_by_email(&email).await? {
            if info.email_verified != Some(true) {
                return Err(AppError::AuthError(
                    "Google email address is not verified".to_string(),
                ));
            }
            self.link_google(user.id, &info.sub).await?;
            log::info!("Linked Google account to existing user {}", user.id);
            return self.finish_login(user, next).await;
        }

        let username = self.unique_username(&email).await?;
        let user = users::ActiveModel {
            username: Set(username),
            email: Set(email),
            password_hash: Set(None),
            first_name: Set(info.given_name.clone().unwrap_or_default()),
            last_name: Set(info.family_name.clone().unwrap_or_default()),
            role: Set(role),
            created_at: Set(Some(Utc::now())),
            updated_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        self.link_google(user.id, &info.sub).await?;
        log::info!("Signed up user {} via Google as {}", user.id, role);

        let redirect_to = match role {
            UserRole::Company => {
                let company = self.company_service.ensure_company_for_user(&user).await?;
                let issued = self.verification_service.issue_code(company).await?;
                let mut params = vec![("just_registered", "1")];
                if let Some(next) = next.as_deref() {
                    params.push(("next", next));
                }
                with_query(&company_verify_path(&issued.company.slug), &params)
            }
            UserRole::Student => {
                self.profile_service.ensure_profile(user.id).await?;
                next.unwrap_or_else(|| student_profile_path(&user.username))
            }
        };

        Ok(AuthResponse {
            tokens: self.issue_tokens(&user)?,
            user: user.into(),
            redirect_to,
        })
    }

    async fn finish_login(&self, user: users::Model, next: Option<String>) -> AppResult<AuthResponse> {
        let redirect_to = match next {
            Some(next) => next,
            None => self.landing_path(&user).await?,
        };
        Ok(AuthResponse {
            tokens: self.issue_tokens(&user)?,
            user: user.into(),
            redirect_to,
        })
    }

    /// 登录后的落地页：学生去资料页；公司未验证先去验证页
    async fn landing_path(&self, user: &users::Model) -> AppResult<String> {
        let company = match user.role {
            UserRole::Company => Some(self.company_service.ensure_company_for_user(user).await?),
            UserRole::Student => self.company_service.find_by_user(user.id).await?,
        };
        Ok(match company {
            Some(company) if company.is_verified => company_profile_path(&company.slug),
            Some(company) => with_query(
                &company_verify_path(&company.slug),
                &[("just_registered", "0")],
            ),
            None => {
                self.profile_service.ensure_profile(user.id).await?;
                student_profile_path(&user.username)
            }
        })
    }

    fn issue_tokens(&self, user: &users::Model) -> AppResult<AuthTokens> {
        Ok(AuthTokens {
            access_token: self
                .jwt_service
                .generate_access_token(user.id, &user.username, user.role)?,
            refresh_token: self
                .jwt_service
                .generate_refresh_token(user.id, &user.username, user.role)?,
            expires_in: self.jwt_service.get_access_token_expires_in(),
        })
    }

    pub async fn find_by_id(&self, user_id: i64) -> AppResult<users::Model> {
        users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<users::Model>> {
        Ok(users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.pool)
            .await?)
    }

    async fn username_taken(&self, username: &str) -> AppResult<bool> {
        Ok(users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .count(&self.pool)
            .await?
            > 0)
    }

    async fn find_linked_user(&self, sub: &str) -> AppResult<Option<users::Model>> {
        let Some(link) = oauth_accounts::Entity::find()
            .filter(oauth_accounts::Column::Provider.eq(GOOGLE_PROVIDER))
            .filter(oauth_accounts::Column::ProviderUserId.eq(sub))
            .one(&self.pool)
            .await?
        else {
            return Ok(None);
        };
        Ok(users::Entity::find_by_id(link.user_id)
            .one(&self.pool)
            .await?)
    }

    async fn link_google(&self, user_id: i64, sub: &str) -> AppResult<()> {
        oauth_accounts::ActiveModel {
            user_id: Set(user_id),
            provider: Set(GOOGLE_PROVIDER.to_string()),
            provider_user_id: Set(sub.to_string()),
            created_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        Ok(())
    }

    /// 从邮箱前缀生成用户名，冲突时追加 6 位随机后缀
    async fn unique_username(&self, email: &str) -> AppResult<String> {
        let local = email.split('@').next().unwrap_or_default();
        let mut base: String = local
            .chars()
            .filter(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
            .take(USERNAME_MAX_LEN - 7)
            .collect();
        if base.is_empty() {
            base = "user".to_string();
        }

        let mut candidate = base.clone();
        while self.username_taken(&candidate).await? {
            candidate = format!("{base}-{}", generate_random_suffix(6));
        }
        Ok(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GoogleConfig;
    use crate::test_support::{RecordingMailer, create_user, setup_db};
    use std::sync::Arc;

    struct Fixture {
        service: AuthService,
        mailer: Arc<RecordingMailer>,
        company_service: CompanyService,
        jwt: JwtService,
        db: DatabaseConnection,
    }

    async fn fixture() -> Fixture {
        let db = setup_db().await;
        let mailer = Arc::new(RecordingMailer::default());
        let jwt = JwtService::new("test-secret", 3600, 7200);
        let company_service = CompanyService::new(db.clone());
        let profile_service = ProfileService::new(db.clone(), company_service.clone());
        let verification_service = VerificationService::new(
            db.clone(),
            mailer.clone(),
            company_service.clone(),
            "/accounts/login".into(),
        );
        let google = GoogleOAuthService::new(GoogleConfig {
            client_id: "client-123".into(),
            client_secret: "secret".into(),
            redirect_uri: "http://localhost/cb".into(),
        });
        let service = AuthService::new(
            db.clone(),
            jwt.clone(),
            google,
            company_service.clone(),
            profile_service,
            verification_service,
        );
        Fixture {
            service,
            mailer,
            company_service,
            jwt,
            db,
        }
    }

    fn register_request(username: &str, email: &str, user_type: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.into(),
            email: email.into(),
            password: "Password123".into(),
            password_confirm: "Password123".into(),
            user_type: Some(user_type.into()),
        }
    }

    fn login_request(email: &str, user_type: Option<&str>) -> LoginRequest {
        LoginRequest {
            email: email.into(),
            password: "Password123".into(),
            user_type: user_type.map(Into::into),
        }
    }

    fn google_user(sub: &str, email: &str) -> GoogleUserInfo {
        GoogleUserInfo {
            sub: sub.into(),
            email: Some(email.into()),
            email_verified: Some(true),
            given_name: Some("Ayşe".into()),
            family_name: Some("Yılmaz".into()),
        }
    }

    #[tokio::test]
    async fn test_register_student() {
        let f = fixture().await;
        let resp = f
            .service
            .register(register_request("ayse", "Ayse@Uni.edu", "student"))
            .await
            .unwrap();
        assert_eq!(resp.user.email, "ayse@uni.edu");
        assert_eq!(resp.user.role, UserRole::Student);
        assert!(resp.tokens.is_none());
        assert_eq!(resp.redirect_to, "/api/v1/auth/login");
        assert!(f.mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn test_register_company_issues_code() {
        let f = fixture().await;
        let resp = f
            .service
            .register(register_request("acme", "hr@acme.com", "recruiter"))
            .await
            .unwrap();
        assert_eq!(resp.user.role, UserRole::Company);
        assert!(resp.tokens.is_some());
        assert_eq!(resp.email_status, Some(EmailStatus::Sent));
        assert_eq!(
            resp.redirect_to,
            "/api/v1/companies/acme/verify?just_registered=1"
        );

        let sent = f.mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "hr@acme.com");
        let company = f.company_service.find_by_slug("acme").await.unwrap();
        assert!(company.verification_code.is_some());
        assert!(!company.is_verified);
    }

    #[tokio::test]
    async fn test_register_validation() {
        let f = fixture().await;
        create_user(&f.db, "taken", "taken@uni.edu", UserRole::Student).await;

        let mut request = register_request("taken", "TAKEN@uni.edu", "student");
        request.password_confirm = "Password124".into();
        let err = f.service.register(request).await.unwrap_err();
        match err {
            AppError::ValidationError(msg) => {
                assert!(msg.contains("username already exists"));
                assert!(msg.contains("email already exists"));
                assert!(msg.contains("didn't match"));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let mut request = register_request("weak", "weak@uni.edu", "student");
        request.password = "password".into();
        request.password_confirm = "password".into();
        assert!(matches!(
            f.service.register(request).await,
            Err(AppError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_login_flows() {
        let f = fixture().await;
        f.service
            .register(register_request("ayse", "ayse@uni.edu", "student"))
            .await
            .unwrap();
        f.service
            .register(register_request("acme", "hr@acme.com", "company"))
            .await
            .unwrap();

        let err = f
            .service
            .login(login_request("ayse@uni.edu", None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(msg) if msg == "Please select a user type."));

        let mut wrong = login_request("ayse@uni.edu", Some("student"));
        wrong.password = "Password999".into();
        let err = f.service.login(wrong).await.unwrap_err();
        assert!(matches!(err, AppError::AuthError(msg) if msg == "Invalid email or password."));

        let err = f
            .service
            .login(login_request("nobody@uni.edu", Some("student")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AuthError(_)));

        let err = f
            .service
            .login(login_request("hr@acme.com", Some("student")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AuthError(msg) if msg.contains("company account")));
        let err = f
            .service
            .login(login_request("ayse@uni.edu", Some("recruiter")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AuthError(msg) if msg.contains("student account")));

        let resp = f
            .service
            .login(login_request("AYSE@uni.edu", Some("student")))
            .await
            .unwrap();
        assert_eq!(resp.redirect_to, "/api/v1/profiles/students/ayse");

        let resp = f
            .service
            .login(login_request("hr@acme.com", Some("company")))
            .await
            .unwrap();
        assert_eq!(
            resp.redirect_to,
            "/api/v1/companies/acme/verify?just_registered=0"
        );
        let claims = f.jwt.verify_access_token(&resp.tokens.access_token).unwrap();
        assert_eq!(claims.role, UserRole::Company);
    }

    #[tokio::test]
    async fn test_verified_company_lands_on_profile() {
        let f = fixture().await;
        f.service
            .register(register_request("acme", "hr@acme.com", "company"))
            .await
            .unwrap();
        let company = f.company_service.find_by_slug("acme").await.unwrap();
        let mut model: crate::entities::company_entity::ActiveModel = company.into();
        model.is_verified = Set(true);
        model.update(&f.db).await.unwrap();

        let resp = f
            .service
            .login(login_request("hr@acme.com", Some("company")))
            .await
            .unwrap();
        assert_eq!(resp.redirect_to, "/api/v1/companies/acme");
    }

    #[tokio::test]
    async fn test_refresh_token() {
        let f = fixture().await;
        f.service
            .register(register_request("ayse", "ayse@uni.edu", "student"))
            .await
            .unwrap();
        let login = f
            .service
            .login(login_request("ayse@uni.edu", Some("student")))
            .await
            .unwrap();

        let resp = f
            .service
            .refresh_token(&login.tokens.refresh_token)
            .await
            .unwrap();
        assert_eq!(resp.user.username, "ayse");
        assert_eq!(resp.tokens.refresh_token, login.tokens.refresh_token);

        // access token 不能当 refresh token 用
        assert!(f
            .service
            .refresh_token(&login.tokens.access_token)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_google_start_encodes_role_in_state() {
        let f = fixture().await;
        let resp = f
            .service
            .google_start(GoogleStartQuery {
                user_type: Some("recruiter".into()),
                next: Some("/jobs".into()),
            })
            .unwrap();
        let url = reqwest::Url::parse(&resp.authorization_url).unwrap();
        let state = url
            .query_pairs()
            .find(|(k, _)| k == "state")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        let claims = f.jwt.verify_oauth_state(&state).unwrap();
        assert_eq!(claims.role, UserRole::Company);
        assert_eq!(claims.next.as_deref(), Some("/jobs"));
    }

    #[tokio::test]
    async fn test_google_signup_company() {
        let f = fixture().await;
        let resp = f
            .service
            .complete_google_login(google_user("g-1", "HR@Globex.com"), UserRole::Company, None)
            .await
            .unwrap();
        assert_eq!(resp.user.username, "hr");
        assert_eq!(resp.user.first_name, "Ayşe");
        assert_eq!(resp.user.role, UserRole::Company);
        assert_eq!(resp.redirect_to, "/api/v1/companies/hr/verify?just_registered=1");
        assert_eq!(f.mailer.sent().len(), 1);

        // 第二次用同一个 Google 账号直接登录，不再发验证码
        let again = f
            .service
            .complete_google_login(google_user("g-1", "hr@globex.com"), UserRole::Student, None)
            .await
            .unwrap();
        assert_eq!(again.user.id, resp.user.id);
        assert_eq!(again.redirect_to, "/api/v1/companies/hr/verify?just_registered=0");
        assert_eq!(f.mailer.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_google_username_collision_and_linking() {
        let f = fixture().await;
        let existing = create_user(&f.db, "ayse", "ayse@uni.edu", UserRole::Student).await;

        // 同邮箱：绑定到已有账号
        let linked = f
            .service
            .complete_google_login(google_user("g-2", "ayse@uni.edu"), UserRole::Student, None)
            .await
            .unwrap();
        assert_eq!(linked.user.id, existing.id);

        // 邮箱前缀与已有用户名冲突：追加随机后缀
        let fresh = f
            .service
            .complete_google_login(
                google_user("g-3", "ayse@gmail.com"),
                UserRole::Student,
                Some("/welcome".into()),
            )
            .await
            .unwrap();
        assert!(fresh.user.username.starts_with("ayse-"));
        assert_eq!(fresh.user.username.len(), "ayse-".len() + 6);
        assert_eq!(fresh.redirect_to, "/welcome");

        let mut unverified = google_user("g-4", "taken@uni.edu");
        unverified.email_verified = Some(false);
        create_user(&f.db, "taken", "taken@uni.edu", UserRole::Student).await;
        let err = f
            .service
            .complete_google_login(unverified, UserRole::Student, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AuthError(_)));
    }
}

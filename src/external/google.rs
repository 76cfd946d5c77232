use crate::config::GoogleConfig;
use crate::error::{AppError, AppResult};
use reqwest::{Client, Url};
use serde::Deserialize;

const AUTHORIZE_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const USERINFO_ENDPOINT: &str = "https://openidconnect.googleapis.com/v1/userinfo";

#[derive(Debug, Deserialize)]
pub struct GoogleTokenResponse {
    pub access_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleUserInfo {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: Option<bool>,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
}

#[derive(Clone)]
pub struct GoogleOAuthService {
    http: Client,
    cfg: GoogleConfig,
}

impl GoogleOAuthService {
    pub fn new(cfg: GoogleConfig) -> Self {
        Self {
            http: Client::new(),
            cfg,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.cfg.client_id.is_empty()
    }

    fn ensure_enabled(&self) -> AppResult<()> {
        if self.is_enabled() {
            Ok(())
        } else {
            Err(AppError::ConfigError("Google login is not configured".into()))
        }
    }

    /// 构造 Google 授权地址
    pub fn authorization_url(&self, state: &str) -> AppResult<String> {
        self.ensure_enabled()?;
        let url = Url::parse_with_params(
            AUTHORIZE_ENDPOINT,
            &[
                ("client_id", self.cfg.client_id.as_str()),
                ("redirect_uri", self.cfg.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", "openid email profile"),
                ("state", state),
                ("prompt", "select_account"),
            ],
        )
        .map_err(|e| AppError::ConfigError(format!("Invalid Google authorize URL: {e}")))?;
        Ok(url.to_string())
    }

    pub async fn exchange_code(&self, code: &str) -> AppResult<GoogleTokenResponse> {
        self.ensure_enabled()?;
        let params = [
            ("code", code),
            ("client_id", self.cfg.client_id.as_str()),
            ("client_secret", self.cfg.client_secret.as_str()),
            ("redirect_uri", self.cfg.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let response = self.http.post(TOKEN_ENDPOINT).form(&params).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            log::error!("Google token exchange failed: HTTP {status}: {error_text}");
            return Err(AppError::ExternalApiError(format!(
                "Google token exchange failed: HTTP {}",
                status.as_u16()
            )));
        }

        Ok(response.json().await?)
    }

    pub async fn fetch_user(&self, access_token: &str) -> AppResult<GoogleUserInfo> {
        let response = self
            .http
            .get(USERINFO_ENDPOINT)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApiError(format!(
                "Google userinfo failed: HTTP {}",
                response.status().as_u16()
            )));
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GoogleConfig {
        GoogleConfig {
            client_id: "client-123".into(),
            client_secret: "secret".into(),
            redirect_uri: "http://localhost:8080/api/v1/auth/google/callback".into(),
        }
    }

    #[test]
    fn test_authorization_url() {
        let google = GoogleOAuthService::new(config());
        let url = Url::parse(&google.authorization_url("st&ate").unwrap()).unwrap();
        let pairs: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs["client_id"], "client-123");
        assert_eq!(pairs["state"], "st&ate");
        assert_eq!(pairs["response_type"], "code");
        assert_eq!(url.host_str(), Some("accounts.google.com"));
    }

    #[test]
    fn test_disabled_without_client_id() {
        let google = GoogleOAuthService::new(GoogleConfig::default());
        assert!(!google.is_enabled());
        assert!(google.authorization_url("x").is_err());
    }

    #[test]
    fn test_token_response_keeps_only_access_token() {
        let raw = r#"{
            "access_token": "ya29.token",
            "expires_in": 3599,
            "id_token": "eyJhbGciOi",
            "scope": "openid email profile",
            "token_type": "Bearer"
        }"#;
        let token: GoogleTokenResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(token.access_token, "ya29.token");
    }
}

use crate::entities::UserRole;
use crate::error::{AppError, AppResult};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

const OAUTH_STATE_TTL_SECONDS: i64 = 600;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    pub username: String,
    pub role: UserRole,
    pub exp: i64,
    pub iat: i64,
    pub token_type: String, // "access" or "refresh"
}

/// OAuth 跳转期间携带的状态（角色选择与回跳地址）
#[derive(Debug, Serialize, Deserialize)]
pub struct OAuthStateClaims {
    pub role: UserRole,
    pub next: Option<String>,
    pub nonce: String,
    pub exp: i64,
    pub iat: i64,
    pub token_type: String, // "oauth_state"
}

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expires_in: i64,
    refresh_token_expires_in: i64,
}

impl JwtService {
    pub fn new(secret: &str, access_expires_in: i64, refresh_expires_in: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expires_in: access_expires_in,
            refresh_token_expires_in: refresh_expires_in,
        }
    }

    fn generate_token(
        &self,
        user_id: i64,
        username: &str,
        role: UserRole,
        token_type: &str,
        expires_in: i64,
    ) -> AppResult<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(expires_in);

        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            role,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            token_type: token_type.to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(AppError::JwtError)
    }

    pub fn generate_access_token(
        &self,
        user_id: i64,
        username: &str,
        role: UserRole,
    ) -> AppResult<String> {
        self.generate_token(user_id, username, role, "access", self.access_token_expires_in)
    }

    pub fn generate_refresh_token(
        &self,
        user_id: i64,
        username: &str,
        role: UserRole,
    ) -> AppResult<String> {
        self.generate_token(user_id, username, role, "refresh", self.refresh_token_expires_in)
    }

    pub fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(AppError::JwtError)
    }

    pub fn verify_access_token(&self, token: &str) -> AppResult<Claims> {
        let claims = self.verify_token(token)?;

        if claims.token_type != "access" {
            return Err(AppError::AuthError("Invalid access token type".to_string()));
        }

        Ok(claims)
    }

    pub fn verify_refresh_token(&self, token: &str) -> AppResult<Claims> {
        let claims = self.verify_token(token)?;

        if claims.token_type != "refresh" {
            return Err(AppError::AuthError("Invalid refresh token type".to_string()));
        }

        Ok(claims)
    }

    pub fn generate_oauth_state(&self, role: UserRole, next: Option<String>) -> AppResult<String> {
        let now = Utc::now();
        let claims = OAuthStateClaims {
            role,
            next,
            nonce: uuid::Uuid::new_v4().to_string(),
            exp: (now + Duration::seconds(OAUTH_STATE_TTL_SECONDS)).timestamp(),
            iat: now.timestamp(),
            token_type: "oauth_state".to_string(),
        };
        encode(&Header::default(), &claims, &self.encoding_key).map_err(AppError::JwtError)
    }

    pub fn verify_oauth_state(&self, state: &str) -> AppResult<OAuthStateClaims> {
        let validation = Validation::new(Algorithm::HS256);
        let claims = decode::<OAuthStateClaims>(state, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| AppError::AuthError("Invalid OAuth state".to_string()))?;

        if claims.token_type != "oauth_state" {
            return Err(AppError::AuthError("Invalid OAuth state".to_string()));
        }
        Ok(claims)
    }

    pub fn get_access_token_expires_in(&self) -> i64 {
        self.access_token_expires_in
    }
}

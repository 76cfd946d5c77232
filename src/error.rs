use crate::models::VerificationError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sea_orm::DbErr),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Verification error: {0}")]
    Verification(#[from] VerificationError),

    #[error("Auth error: {0}")]
    AuthError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Permission denied")]
    PermissionDenied,

    #[error("External API error: {0}")]
    ExternalApiError(String),

    #[error("Mail error: {0}")]
    MailError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("HTTP request error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
}

impl AppError {
    /// 状态码和错误码，status_code 与 error_response 共用
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::ValidationError(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::Verification(err) => (StatusCode::BAD_REQUEST, err.error_code()),
            AppError::AuthError(_) | AppError::JwtError(_) => {
                (StatusCode::UNAUTHORIZED, "AUTH_ERROR")
            }
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::PermissionDenied => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            AppError::ExternalApiError(_) | AppError::ReqwestError(_) => {
                (StatusCode::BAD_GATEWAY, "EXTERNAL_API_ERROR")
            }
            AppError::DatabaseError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    /// 返回给客户端的消息，内部错误不暴露细节
    fn public_message(&self) -> String {
        match self {
            AppError::ValidationError(msg)
            | AppError::AuthError(msg)
            | AppError::NotFound(msg)
            | AppError::ExternalApiError(msg) => msg.clone(),
            AppError::Verification(err) => err.to_string(),
            AppError::JwtError(_) => "Invalid token".to_string(),
            AppError::PermissionDenied => "Permission denied".to_string(),
            AppError::ReqwestError(_) => "Upstream request failed".to_string(),
            AppError::DatabaseError(_) => "Database error".to_string(),
            _ => "Internal server error".to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status_and_code().0
    }

    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code) = self.status_and_code();
        match self {
            AppError::NotFound(_) => {}
            _ if status_code.is_server_error() => log::error!("{self}"),
            _ => log::warn!("{self}"),
        }

        HttpResponse::build(status_code).json(json!({
            "success": false,
            "error": {
                "code": error_code,
                "message": self.public_message()
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn test_verification_errors_are_bad_request() {
        let resp = AppError::from(VerificationError::Expired).error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["error"]["code"], "CODE_EXPIRED");
    }

    #[actix_web::test]
    async fn test_database_error_hides_details() {
        let resp = AppError::DatabaseError(sea_orm::DbErr::Custom("boom".into())).error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["error"]["message"], "Database error");
    }

    #[test]
    fn test_status_code_matches_response() {
        let errors = [
            AppError::AuthError("missing token".into()),
            AppError::PermissionDenied,
            AppError::NotFound("Company not found".into()),
            AppError::ValidationError("bad".into()),
            AppError::MailError("down".into()),
        ];
        for err in errors {
            assert_eq!(err.status_code(), err.error_response().status());
        }
        assert_eq!(
            AppError::AuthError("missing token".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::PermissionDenied.status_code(), StatusCode::FORBIDDEN);
    }
}

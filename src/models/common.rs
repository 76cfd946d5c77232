use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 错误响应体 `{"success": false, "error": {...}}` 中的 error 部分
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    #[schema(example = "INVALID_CODE")]
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    pub success: bool,
    pub error: ApiError,
}

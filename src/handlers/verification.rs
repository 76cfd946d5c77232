use actix_web::{HttpRequest, HttpResponse, Result, ResponseError, web};
use serde_json::json;

use super::current_user;
use crate::models::*;
use crate::services::{AuthService, VerificationService};

/// 查询串里的 next 优先，其次是请求体
fn query_or_body_next(query: NextQuery, body: Option<String>) -> Option<String> {
    query
        .next
        .filter(|next| !next.trim().is_empty())
        .or(body)
}

#[utoipa::path(
    get,
    path = "/companies/me/verify",
    tag = "verification",
    security(("bearer_auth" = [])),
    params(
        ("next" = Option<String>, Query, description = "验证成功后的回跳地址"),
        ("just_registered" = Option<String>, Query, description = "刚注册时为 1")
    ),
    responses(
        (status = 200, description = "带 slug 的验证地址", body = VerifyEntryResponse),
        (status = 401, description = "未授权", body = ApiErrorResponse)
    )
)]
pub async fn verify_entry(
    auth_service: web::Data<AuthService>,
    verification_service: web::Data<VerificationService>,
    req: HttpRequest,
    query: web::Query<VerifyEntryQuery>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    let user = match auth_service.find_by_id(user.id).await {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    match verification_service.entry(&user, query.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/companies/{slug}/verify",
    tag = "verification",
    security(("bearer_auth" = [])),
    params(("slug" = String, Path, description = "公司 slug")),
    responses(
        (status = 200, description = "验证状态", body = VerificationStatusResponse),
        (status = 404, description = "不是自己的公司", body = ApiErrorResponse)
    )
)]
pub async fn verification_status(
    verification_service: web::Data<VerificationService>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    match verification_service.status(user.id, &path.into_inner()).await {
        Ok(status) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": status
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/companies/{slug}/send-code",
    tag = "verification",
    security(("bearer_auth" = [])),
    params(
        ("slug" = String, Path, description = "公司 slug"),
        ("next" = Option<String>, Query, description = "验证后的回跳地址，优先于请求体")
    ),
    request_body = SendCodeRequest,
    responses(
        (status = 200, description = "验证码已生成，email_status 表示投递结果", body = SendCodeResponse),
        (status = 400, description = "邮箱格式错误", body = ApiErrorResponse),
        (status = 404, description = "不是自己的公司", body = ApiErrorResponse)
    )
)]
pub async fn send_code(
    verification_service: web::Data<VerificationService>,
    req: HttpRequest,
    path: web::Path<String>,
    query: web::Query<NextQuery>,
    request: Option<web::Json<SendCodeRequest>>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    let mut request = request.map(web::Json::into_inner).unwrap_or(SendCodeRequest {
        verification_email: None,
        next: None,
    });
    request.next = query_or_body_next(query.into_inner(), request.next);
    match verification_service
        .resend_code(user.id, &path.into_inner(), request)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/companies/{slug}/verify",
    tag = "verification",
    security(("bearer_auth" = [])),
    params(
        ("slug" = String, Path, description = "公司 slug"),
        ("next" = Option<String>, Query, description = "验证成功后的回跳地址，优先于请求体")
    ),
    request_body = VerifyCodeRequest,
    responses(
        (status = 200, description = "验证成功", body = VerifyCodeResponse),
        (status = 400, description = "NO_ACTIVE_CODE / CODE_EXPIRED / INVALID_CODE", body = ApiErrorResponse),
        (status = 404, description = "不是自己的公司", body = ApiErrorResponse)
    )
)]
pub async fn verify_code(
    verification_service: web::Data<VerificationService>,
    req: HttpRequest,
    path: web::Path<String>,
    query: web::Query<NextQuery>,
    request: web::Json<VerifyCodeRequest>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    let mut request = request.into_inner();
    request.next = query_or_body_next(query.into_inner(), request.next);
    match verification_service
        .verify_code(user.id, &path.into_inner(), request)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

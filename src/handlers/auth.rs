use actix_web::{HttpRequest, HttpResponse, Result, ResponseError, web};
use serde_json::json;

use crate::models::*;
use crate::services::AuthService;

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "注册成功", body = RegisterResponse),
        (status = 400, description = "表单校验失败", body = ApiErrorResponse)
    )
)]
pub async fn register(
    auth_service: web::Data<AuthService>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    match auth_service.register(request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "登录成功", body = AuthResponse),
        (status = 400, description = "未选择用户类型", body = ApiErrorResponse),
        (status = 401, description = "邮箱或密码错误，或角色不符", body = ApiErrorResponse)
    )
)]
pub async fn login(
    auth_service: web::Data<AuthService>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    match auth_service.login(request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/auth/refresh",
    tag = "auth",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "刷新令牌成功", body = AuthResponse),
        (status = 401, description = "无效的刷新令牌", body = ApiErrorResponse)
    )
)]
pub async fn refresh(
    auth_service: web::Data<AuthService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    let Some(token) = token else {
        return Ok(HttpResponse::Unauthorized().json(json!({
            "success": false,
            "error": {
                "code": "MISSING_TOKEN",
                "message": "Missing refresh token"
            }
        })));
    };

    match auth_service.refresh_token(token).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "登出成功")
    )
)]
pub async fn logout() -> Result<HttpResponse> {
    // 令牌无状态，客户端丢弃即可
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": {
            "redirect_to": crate::utils::login_path()
        },
        "message": "You have been logged out."
    })))
}

#[utoipa::path(
    get,
    path = "/auth/google/start",
    tag = "auth",
    params(
        ("user_type" = Option<String>, Query, description = "student / company / recruiter"),
        ("next" = Option<String>, Query, description = "登录后回跳地址")
    ),
    responses(
        (status = 200, description = "Google 授权地址", body = GoogleStartResponse),
        (status = 500, description = "未配置 Google 登录", body = ApiErrorResponse)
    )
)]
pub async fn google_start(
    auth_service: web::Data<AuthService>,
    query: web::Query<GoogleStartQuery>,
) -> Result<HttpResponse> {
    match auth_service.google_start(query.into_inner()) {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/auth/google/callback",
    tag = "auth",
    params(
        ("code" = String, Query, description = "Google 授权码"),
        ("state" = String, Query, description = "google/start 签发的 state")
    ),
    responses(
        (status = 200, description = "登录成功", body = AuthResponse),
        (status = 401, description = "state 无效", body = ApiErrorResponse),
        (status = 502, description = "Google 接口失败", body = ApiErrorResponse)
    )
)]
pub async fn google_callback(
    auth_service: web::Data<AuthService>,
    query: web::Query<GoogleCallbackQuery>,
) -> Result<HttpResponse> {
    match auth_service.google_callback(query.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn auth_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/refresh", web::post().to(refresh))
            .route("/logout", web::post().to(logout))
            .route("/google/start", web::get().to(google_start))
            .route("/google/callback", web::get().to(google_callback)),
    );
}

use actix_web::{HttpRequest, HttpResponse, Result, ResponseError, web};
use serde_json::json;

use super::{current_user, verification};
use crate::models::*;
use crate::services::CompanyService;

#[utoipa::path(
    get,
    path = "/companies/{slug}",
    tag = "companies",
    security(("bearer_auth" = [])),
    params(
        ("slug" = String, Path, description = "公司 slug"),
        ("tab" = Option<String>, Query, description = "前端当前标签"),
        ("major" = Option<String>, Query, description = "专业（包含，忽略大小写）"),
        ("skill" = Option<String>, Query, description = "技能名（包含，忽略大小写）"),
        ("project_skill" = Option<String>, Query, description = "项目技术栈（包含，忽略大小写）"),
        ("location" = Option<String>, Query, description = "所在地（包含，忽略大小写）"),
        ("graduation_year" = Option<String>, Query, description = "毕业年份"),
        ("internship_type" = Option<String>, Query, description = "实习类型（忽略大小写）")
    ),
    responses(
        (status = 200, description = "公司主页", body = CompanyPageResponse),
        (status = 404, description = "公司不存在", body = ApiErrorResponse)
    )
)]
pub async fn company_page(
    company_service: web::Data<CompanyService>,
    path: web::Path<String>,
    query: web::Query<StudentFilterQuery>,
) -> Result<HttpResponse> {
    match company_service
        .company_page(&path.into_inner(), query.into_inner())
        .await
    {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": page
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/companies/{slug}",
    tag = "companies",
    security(("bearer_auth" = [])),
    params(("slug" = String, Path, description = "公司 slug")),
    request_body = UpdateCompanyRequest,
    responses(
        (status = 200, description = "更新成功", body = CompanyResponse),
        (status = 400, description = "请求参数错误", body = ApiErrorResponse),
        (status = 404, description = "不是自己的公司", body = ApiErrorResponse)
    )
)]
pub async fn update_company(
    company_service: web::Data<CompanyService>,
    req: HttpRequest,
    path: web::Path<String>,
    request: web::Json<UpdateCompanyRequest>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    match company_service
        .update_company_info(user.id, &path.into_inner(), request.into_inner())
        .await
    {
        Ok(company) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": company
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/companies/{slug}/positions",
    tag = "companies",
    security(("bearer_auth" = [])),
    params(("slug" = String, Path, description = "公司 slug")),
    request_body = CreatePositionRequest,
    responses(
        (status = 200, description = "职位已添加", body = PositionResponse),
        (status = 400, description = "请求参数错误", body = ApiErrorResponse)
    )
)]
pub async fn add_position(
    company_service: web::Data<CompanyService>,
    req: HttpRequest,
    path: web::Path<String>,
    request: web::Json<CreatePositionRequest>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    match company_service
        .add_position(user.id, &path.into_inner(), request.into_inner())
        .await
    {
        Ok(position) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": position
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/companies/{slug}/social",
    tag = "companies",
    security(("bearer_auth" = [])),
    params(("slug" = String, Path, description = "公司 slug")),
    request_body = UpdateCompanySocialRequest,
    responses(
        (status = 200, description = "更新成功", body = CompanyResponse),
        (status = 400, description = "链接无效", body = ApiErrorResponse)
    )
)]
pub async fn update_social(
    company_service: web::Data<CompanyService>,
    req: HttpRequest,
    path: web::Path<String>,
    request: web::Json<UpdateCompanySocialRequest>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    match company_service
        .update_social(user.id, &path.into_inner(), request.into_inner())
        .await
    {
        Ok(company) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": company
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/companies/bookmarks/{profile_id}/toggle",
    tag = "companies",
    security(("bearer_auth" = [])),
    params(("profile_id" = i64, Path, description = "学生资料 ID")),
    request_body = ToggleBookmarkRequest,
    responses(
        (status = 200, description = "收藏状态已切换", body = ToggleBookmarkResponse),
        (status = 403, description = "当前用户没有公司", body = ApiErrorResponse),
        (status = 404, description = "学生不存在", body = ApiErrorResponse)
    )
)]
pub async fn toggle_bookmark(
    company_service: web::Data<CompanyService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: Option<web::Json<ToggleBookmarkRequest>>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    let request = request
        .map(web::Json::into_inner)
        .unwrap_or(ToggleBookmarkRequest { next: None });
    match company_service
        .toggle_bookmark(user.id, path.into_inner(), request)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn company_config(cfg: &mut web::ServiceConfig) {
    // 固定路径必须先于 /{slug} 注册
    cfg.service(
        web::scope("/companies")
            .route("/me/verify", web::get().to(verification::verify_entry))
            .route(
                "/bookmarks/{profile_id}/toggle",
                web::post().to(toggle_bookmark),
            )
            .route("/{slug}", web::get().to(company_page))
            .route("/{slug}", web::put().to(update_company))
            .route("/{slug}/positions", web::post().to(add_position))
            .route("/{slug}/social", web::put().to(update_social))
            .route("/{slug}/verify", web::get().to(verification::verification_status))
            .route("/{slug}/verify", web::post().to(verification::verify_code))
            .route("/{slug}/send-code", web::post().to(verification::send_code)),
    );
}

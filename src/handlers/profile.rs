use actix_web::{HttpRequest, HttpResponse, Result, ResponseError, web};
use serde::Serialize;
use serde_json::json;

use super::current_user;
use crate::error::AppResult;
use crate::models::*;
use crate::services::{AuthService, ProfileService};

fn respond<T: Serialize>(result: AppResult<T>) -> HttpResponse {
    match result {
        Ok(data) => HttpResponse::Ok().json(json!({
            "success": true,
            "data": data
        })),
        Err(e) => e.error_response(),
    }
}

#[utoipa::path(
    get,
    path = "/profiles/redirect",
    tag = "profiles",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "当前用户的资料页地址", body = RedirectResponse),
        (status = 401, description = "未授权", body = ApiErrorResponse)
    )
)]
pub async fn profile_redirect(
    auth_service: web::Data<AuthService>,
    profile_service: web::Data<ProfileService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    let result = match auth_service.find_by_id(user.id).await {
        Ok(model) => profile_service.redirect_for(&model).await,
        Err(e) => Err(e),
    };
    Ok(respond(result))
}

#[utoipa::path(
    get,
    path = "/profiles/skills",
    tag = "profiles",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "全部技能", body = [SkillResponse])
    )
)]
pub async fn list_skills(profile_service: web::Data<ProfileService>) -> Result<HttpResponse> {
    Ok(respond(profile_service.list_skills().await))
}

#[utoipa::path(
    get,
    path = "/profiles/students/{username}",
    tag = "profiles",
    security(("bearer_auth" = [])),
    params(("username" = String, Path, description = "用户名")),
    responses(
        (status = 200, description = "学生资料", body = StudentProfileDetail),
        (status = 404, description = "用户不存在", body = ApiErrorResponse)
    )
)]
pub async fn student_detail(
    profile_service: web::Data<ProfileService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    Ok(respond(profile_service.detail(&path.into_inner()).await))
}

#[utoipa::path(
    put,
    path = "/profiles/students/{username}/personal",
    tag = "profiles",
    security(("bearer_auth" = [])),
    params(("username" = String, Path, description = "用户名")),
    request_body = UpdatePersonalInfoRequest,
    responses(
        (status = 200, description = "更新成功", body = StudentProfileDetail),
        (status = 400, description = "必填项缺失", body = ApiErrorResponse),
        (status = 403, description = "不是本人", body = ApiErrorResponse)
    )
)]
pub async fn update_personal(
    profile_service: web::Data<ProfileService>,
    req: HttpRequest,
    path: web::Path<String>,
    request: web::Json<UpdatePersonalInfoRequest>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    Ok(respond(
        profile_service
            .update_personal(user.id, &path.into_inner(), request.into_inner())
            .await,
    ))
}

#[utoipa::path(
    post,
    path = "/profiles/students/{username}/projects",
    tag = "profiles",
    security(("bearer_auth" = [])),
    params(("username" = String, Path, description = "用户名")),
    request_body = CreateProjectRequest,
    responses(
        (status = 200, description = "项目已添加", body = ProjectResponse),
        (status = 400, description = "请求参数错误", body = ApiErrorResponse)
    )
)]
pub async fn add_project(
    profile_service: web::Data<ProfileService>,
    req: HttpRequest,
    path: web::Path<String>,
    request: web::Json<CreateProjectRequest>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    Ok(respond(
        profile_service
            .add_project(user.id, &path.into_inner(), request.into_inner())
            .await,
    ))
}

#[utoipa::path(
    post,
    path = "/profiles/students/{username}/certifications",
    tag = "profiles",
    security(("bearer_auth" = [])),
    params(("username" = String, Path, description = "用户名")),
    request_body = CreateCertificationRequest,
    responses(
        (status = 200, description = "证书已添加", body = CertificationResponse),
        (status = 400, description = "请求参数错误", body = ApiErrorResponse)
    )
)]
pub async fn add_certification(
    profile_service: web::Data<ProfileService>,
    req: HttpRequest,
    path: web::Path<String>,
    request: web::Json<CreateCertificationRequest>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    Ok(respond(
        profile_service
            .add_certification(user.id, &path.into_inner(), request.into_inner())
            .await,
    ))
}

#[utoipa::path(
    put,
    path = "/profiles/students/{username}/social",
    tag = "profiles",
    security(("bearer_auth" = [])),
    params(("username" = String, Path, description = "用户名")),
    request_body = UpdateStudentSocialRequest,
    responses(
        (status = 200, description = "更新成功", body = StudentProfileResponse),
        (status = 400, description = "链接无效", body = ApiErrorResponse)
    )
)]
pub async fn update_social(
    profile_service: web::Data<ProfileService>,
    req: HttpRequest,
    path: web::Path<String>,
    request: web::Json<UpdateStudentSocialRequest>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    Ok(respond(
        profile_service
            .update_social(user.id, &path.into_inner(), request.into_inner())
            .await,
    ))
}

#[utoipa::path(
    put,
    path = "/profiles/students/{username}/internship",
    tag = "profiles",
    security(("bearer_auth" = [])),
    params(("username" = String, Path, description = "用户名")),
    request_body = UpdateInternshipRequest,
    responses(
        (status = 200, description = "更新成功", body = StudentProfileResponse)
    )
)]
pub async fn update_internship(
    profile_service: web::Data<ProfileService>,
    req: HttpRequest,
    path: web::Path<String>,
    request: web::Json<UpdateInternshipRequest>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    Ok(respond(
        profile_service
            .update_internship(user.id, &path.into_inner(), request.into_inner())
            .await,
    ))
}

#[utoipa::path(
    put,
    path = "/profiles/students/{username}/skills",
    tag = "profiles",
    security(("bearer_auth" = [])),
    params(("username" = String, Path, description = "用户名")),
    request_body = UpdateSkillsRequest,
    responses(
        (status = 200, description = "当前技能", body = [SkillResponse]),
        (status = 400, description = "技能不存在", body = ApiErrorResponse)
    )
)]
pub async fn update_skills(
    profile_service: web::Data<ProfileService>,
    req: HttpRequest,
    path: web::Path<String>,
    request: web::Json<UpdateSkillsRequest>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };
    Ok(respond(
        profile_service
            .set_skills(user.id, &path.into_inner(), request.into_inner())
            .await,
    ))
}

#[utoipa::path(
    get,
    path = "/profiles/students/by-id/{user_id}",
    tag = "profiles",
    security(("bearer_auth" = [])),
    params(("user_id" = i64, Path, description = "学生用户 ID")),
    responses(
        (status = 200, description = "学生公开资料", body = StudentPublicProfile),
        (status = 404, description = "资料不存在", body = ApiErrorResponse)
    )
)]
pub async fn public_profile(
    profile_service: web::Data<ProfileService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    Ok(respond(
        profile_service.public_profile(path.into_inner()).await,
    ))
}

#[utoipa::path(
    post,
    path = "/profiles/students/by-id/{user_id}/views",
    tag = "profiles",
    security(("bearer_auth" = [])),
    params(
        ("user_id" = i64, Path, description = "学生用户 ID"),
        ("next" = Option<String>, Query, description = "回跳地址")
    ),
    responses(
        (status = 200, description = "浏览量 +1", body = ProfileViewsResponse),
        (status = 404, description = "资料不存在", body = ApiErrorResponse)
    )
)]
pub async fn increment_views(
    profile_service: web::Data<ProfileService>,
    path: web::Path<i64>,
    query: web::Query<NextQuery>,
) -> Result<HttpResponse> {
    Ok(respond(
        profile_service
            .increment_views(path.into_inner(), query.into_inner().next)
            .await,
    ))
}

pub fn profile_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/profiles")
            .route("/redirect", web::get().to(profile_redirect))
            .route("/skills", web::get().to(list_skills))
            .route("/students/by-id/{user_id}", web::get().to(public_profile))
            .route(
                "/students/by-id/{user_id}/views",
                web::post().to(increment_views),
            )
            .route("/students/{username}", web::get().to(student_detail))
            .route("/students/{username}/personal", web::put().to(update_personal))
            .route("/students/{username}/projects", web::post().to(add_project))
            .route(
                "/students/{username}/certifications",
                web::post().to(add_certification),
            )
            .route("/students/{username}/social", web::put().to(update_social))
            .route(
                "/students/{username}/internship",
                web::put().to(update_internship),
            )
            .route("/students/{username}/skills", web::put().to(update_skills)),
    );
}

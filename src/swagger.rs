use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::UserRole;
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::refresh,
        handlers::auth::logout,
        handlers::auth::google_start,
        handlers::auth::google_callback,
        handlers::profile::profile_redirect,
        handlers::profile::list_skills,
        handlers::profile::student_detail,
        handlers::profile::update_personal,
        handlers::profile::add_project,
        handlers::profile::add_certification,
        handlers::profile::update_social,
        handlers::profile::update_internship,
        handlers::profile::update_skills,
        handlers::profile::public_profile,
        handlers::profile::increment_views,
        handlers::company::company_page,
        handlers::company::update_company,
        handlers::company::add_position,
        handlers::company::update_social,
        handlers::company::toggle_bookmark,
        handlers::verification::verify_entry,
        handlers::verification::verification_status,
        handlers::verification::send_code,
        handlers::verification::verify_code,
    ),
    components(
        schemas(
            UserRole,
            UserResponse,
            RegisterRequest,
            RegisterResponse,
            LoginRequest,
            AuthTokens,
            AuthResponse,
            GoogleStartResponse,
            SkillResponse,
            ProjectResponse,
            CertificationResponse,
            StudentProfileResponse,
            StudentProfileDetail,
            StudentPublicProfile,
            UpdatePersonalInfoRequest,
            CreateProjectRequest,
            CreateCertificationRequest,
            UpdateStudentSocialRequest,
            UpdateInternshipRequest,
            UpdateSkillsRequest,
            ProfileViewsResponse,
            RedirectResponse,
            CompanyResponse,
            PositionResponse,
            StudentCard,
            CompanyPageResponse,
            UpdateCompanyRequest,
            CreatePositionRequest,
            UpdateCompanySocialRequest,
            ToggleBookmarkRequest,
            ToggleBookmarkResponse,
            EmailStatus,
            SendCodeRequest,
            SendCodeResponse,
            VerifyCodeRequest,
            VerifyCodeResponse,
            VerificationStatusResponse,
            VerifyEntryResponse,
            ApiError,
            ApiErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration, login and Google OAuth"),
        (name = "profiles", description = "Student profiles"),
        (name = "companies", description = "Company profiles, positions and bookmarks"),
        (name = "verification", description = "Company email verification codes"),
    ),
    info(
        title = "lazyIntern Backend API",
        version = "1.0.0",
        description = "REST API connecting students and companies"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_verification_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/companies/{slug}/verify"));
        assert!(doc.paths.paths.contains_key("/companies/{slug}/send-code"));
        assert!(doc.paths.paths.contains_key("/auth/google/callback"));
    }
}

pub mod auth;
pub mod company;
pub mod profile;
pub mod verification;

pub use auth::auth_config;
pub use company::company_config;
pub use profile::profile_config;

use crate::error::{AppError, AppResult};
use crate::middlewares::{AuthUser, get_current_user};
use actix_web::HttpRequest;

fn current_user(req: &HttpRequest) -> AppResult<AuthUser> {
    get_current_user(req).ok_or_else(|| AppError::AuthError("Missing access token".to_string()))
}

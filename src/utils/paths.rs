//! 前端跳转地址（`redirect_to`）的拼装

use reqwest::Url;

pub const API_PREFIX: &str = "/api/v1";

pub fn login_path() -> String {
    format!("{API_PREFIX}/auth/login")
}

pub fn student_profile_path(username: &str) -> String {
    format!("{API_PREFIX}/profiles/students/{username}")
}

pub fn student_public_path(user_id: i64) -> String {
    format!("{API_PREFIX}/profiles/students/by-id/{user_id}")
}

pub fn company_profile_path(slug: &str) -> String {
    format!("{API_PREFIX}/companies/{slug}")
}

pub fn company_verify_path(slug: &str) -> String {
    format!("{API_PREFIX}/companies/{slug}/verify")
}

/// 在路径后追加 query 参数（自动编码）；没有参数时原样返回
pub fn with_query(path: &str, params: &[(&str, &str)]) -> String {
    if params.is_empty() {
        return path.to_string();
    }
    let mut url = Url::parse("http://localhost").expect("static base url");
    url.set_path(path);
    url.query_pairs_mut().extend_pairs(params);
    match url.query() {
        Some(q) => format!("{}?{}", url.path(), q),
        None => url.path().to_string(),
    }
}

//! 表单字段的清洗与校验

use crate::error::{AppError, AppResult};
use regex::Regex;
use reqwest::Url;
use std::sync::OnceLock;

/// 去掉首尾空白；`none` / `null` / `undefined` / `-` 视为未填写
pub fn normalize(value: Option<&str>) -> Option<String> {
    let v = value?.trim();
    match v.to_ascii_lowercase().as_str() {
        "none" | "null" | "undefined" | "-" => None,
        _ => Some(v.to_string()),
    }
}

/// 同 `normalize`，但空串也视为未填写
pub fn normalize_non_empty(value: Option<&str>) -> Option<String> {
    normalize(value).filter(|v| !v.is_empty())
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$")
            .expect("valid regex")
    })
}

pub fn is_valid_email(email: &str) -> bool {
    email.len() <= 254 && email_re().is_match(email)
}

pub fn validate_email(email: &str) -> AppResult<()> {
    if !is_valid_email(email) {
        return Err(AppError::ValidationError(
            "Enter a valid email address.".to_string(),
        ));
    }
    Ok(())
}

/// 用户名：1-150 个字符，只允许字母、数字与 @/./+/-/_
pub fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && username.chars().count() <= 150
        && username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
}

/// 校验可选 URL 字段，只接受 http/https
pub fn validate_optional_url(field: &str, value: Option<String>) -> AppResult<Option<String>> {
    let Some(raw) = normalize_non_empty(value.as_deref()) else {
        return Ok(None);
    };
    match Url::parse(&raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.host().is_some() => {
            Ok(Some(raw))
        }
        _ => Err(AppError::ValidationError(format!(
            "{field}: Enter a valid URL."
        ))),
    }
}

use bcrypt::{hash, verify, DEFAULT_COST};
use crate::error::{AppError, AppResult};

const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 128;

// 小写比较
const COMMON_PASSWORDS: &[&str] = &[
    "password", "12345678", "123456789", "1234567890", "qwerty123", "qwertyuiop",
    "iloveyou", "11111111", "abc12345", "sunshine", "princess", "football",
    "baseball", "welcome1", "letmein1", "trustno1", "passw0rd", "superman",
];

/// 用户属性里参与相似度比较的片段，如 `ayse.demir@uni.edu` -> ayse, demir, uni, edu
fn attribute_parts(attribute: &str) -> impl Iterator<Item = String> + '_ {
    attribute
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| part.chars().count() >= 4)
        .map(str::to_lowercase)
}

/// 验证密码强度，`attributes` 为 (字段名, 值)，例如 ("username", "ayse")
pub fn validate_password(password: &str, attributes: &[(&str, &str)]) -> AppResult<()> {
    let mut errors = Vec::new();
    let length = password.chars().count();

    if length < MIN_PASSWORD_LENGTH {
        errors.push(format!(
            "This password is too short. It must contain at least {MIN_PASSWORD_LENGTH} characters."
        ));
    } else if length > MAX_PASSWORD_LENGTH {
        errors.push(format!(
            "This password is too long. It must contain at most {MAX_PASSWORD_LENGTH} characters."
        ));
    }

    let lowered = password.to_lowercase();
    if let Some((name, _)) = attributes.iter().find(|(_, value)| {
        let whole = value.to_lowercase();
        (!whole.is_empty() && whole == lowered)
            || attribute_parts(value).any(|part| lowered.contains(&part))
    }) {
        errors.push(format!("The password is too similar to the {name}."));
    }

    if COMMON_PASSWORDS.contains(&lowered.as_str()) {
        errors.push("This password is too common.".to_string());
    }
    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        errors.push("This password is entirely numeric.".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::ValidationError(errors.join(" ")))
    }
}

/// 对密码进行哈希
pub fn hash_password(password: &str) -> AppResult<String> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::InternalError(format!("Failed to hash password: {}", e)))
}

/// 验证密码
pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    verify(password, hash)
        .map_err(|e| AppError::InternalError(format!("Failed to verify password: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(result: AppResult<()>) -> String {
        match result {
            Err(AppError::ValidationError(msg)) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_password() {
        let attrs = [("username", "ayse"), ("email address", "ayse.demir@uni.edu")];
        assert!(validate_password("Password123", &attrs).is_ok());
        assert!(validate_password("Short1", &attrs).is_err());
        assert!(message(validate_password("84736251", &attrs)).contains("entirely numeric"));
        assert!(message(validate_password("Password", &attrs)).contains("too common"));
        assert!(message(validate_password("DemirRocks9", &attrs)).contains("email address"));
    }

    #[test]
    fn test_short_numeric_password_reports_every_problem() {
        let msg = message(validate_password("1234", &[]));
        assert!(msg.contains("too short"));
        assert!(msg.contains("entirely numeric"));
    }

    #[test]
    fn test_hash_and_verify_password() {
        let password = "Password123";
        let hashed = hash_password(password).unwrap();

        assert!(verify_password(password, &hashed).unwrap());
        assert!(!verify_password("WrongPassword", &hashed).unwrap());
    }
}

use rand::Rng;
use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;

/// 生成6位数字验证码（允许前导 0），使用系统 CSPRNG
pub fn generate_six_digit_code() -> String {
    format!("{:06}", OsRng.gen_range(0..1_000_000u32))
}

/// 生成小写字母数字随机串，用于用户名去重后缀
pub fn generate_random_suffix(len: usize) -> String {
    OsRng
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(|b| (b as char).to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_six_digit_code() {
        for _ in 0..200 {
            let code = generate_six_digit_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_generate_random_suffix() {
        let suffix = generate_random_suffix(6);
        assert_eq!(suffix.len(), 6);
        assert!(
            suffix
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        );
    }
}

use regex::Regex;
use std::sync::OnceLock;

fn strip_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s-]").expect("valid regex"))
}

fn dash_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[-\s]+").expect("valid regex"))
}

/// 生成 URL 友好的 slug：小写 ASCII，去掉标点，空白与连字符合并为 `-`
pub fn slugify(value: &str) -> String {
    let ascii: String = value
        .chars()
        .filter(|c| c.is_ascii())
        .collect::<String>()
        .to_ascii_lowercase();
    let stripped = strip_re().replace_all(&ascii, "");
    let dashed = dash_re().replace_all(stripped.trim(), "-");
    dashed.trim_matches(|c| c == '-' || c == '_').to_string()
}

/// 第 n 个候选 slug：`base`, `base-2`, `base-3`, ...
pub fn slug_candidate(base: &str, attempt: u32) -> String {
    if attempt <= 1 {
        base.to_string()
    } else {
        format!("{base}-{attempt}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Acme Corp"), "acme-corp");
        assert_eq!(slugify("  Hello,   World!  "), "hello-world");
        assert_eq!(slugify("foo--bar__baz"), "foo-bar__baz");
        assert_eq!(slugify("-_edge_-"), "edge");
        assert_eq!(slugify("Şirket Ltd."), "irket-ltd");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_slug_candidate() {
        assert_eq!(slug_candidate("acme", 1), "acme");
        assert_eq!(slug_candidate("acme", 2), "acme-2");
        assert_eq!(slug_candidate("acme", 10), "acme-10");
    }
}

//! 公司邮箱验证邮件的标题与正文

use crate::models::CODE_TTL_MINUTES;

const SUBJECT_BASE: &str = "lazyIntern | Company email verification";

pub fn verification_subject(company_name: Option<&str>) -> String {
    match company_name.filter(|n| !n.is_empty()) {
        Some(name) => format!("{SUBJECT_BASE} - {name}"),
        None => SUBJECT_BASE.to_string(),
    }
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// 返回 (纯文本, HTML) 两种正文
pub fn verification_bodies(code: &str, company_name: Option<&str>) -> (String, String) {
    let name = company_name.filter(|n| !n.is_empty());
    let sub_text = name.map(|n| format!("for {n} ")).unwrap_or_default();
    let sub_html = name
        .map(|n| format!("for {} ", escape_html(n)))
        .unwrap_or_default();

    let text_body = format!(
        "Company Email Verification\n\n\
         Your verification code {sub_text}is: {code}\n\
         This code is valid for {CODE_TTL_MINUTES} minutes.\n\n\
         Thanks,\n\
         The lazyIntern Team"
    );

    let html_body = format!(
        r#"<div style="font-family:ui-sans-serif, system-ui, -apple-system, Segoe UI, Roboto, Arial; max-width:560px">
  <h2 style="margin:0 0 8px">Company Email Verification</h2>
  <p style="color:#475569;margin:0 0 16px">
    Your verification code {sub_html}is below. The code is valid for {CODE_TTL_MINUTES} minutes.
  </p>
  <div style="font-size:28px;font-weight:800;letter-spacing:4px;padding:14px 16px;border:1px solid #e2e8f0;border-radius:12px;text-align:center;background:#f8fafc;margin-bottom:12px;">
    {code}
  </div>
  <p style="color:#64748b">Thanks,<br/>The lazyIntern Team</p>
</div>"#
    );

    (text_body, html_body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject() {
        assert_eq!(
            verification_subject(Some("Acme")),
            "lazyIntern | Company email verification - Acme"
        );
        assert_eq!(
            verification_subject(None),
            "lazyIntern | Company email verification"
        );
        assert_eq!(
            verification_subject(Some("")),
            "lazyIntern | Company email verification"
        );
    }

    #[test]
    fn test_bodies_contain_code_and_ttl() {
        let (text, html) = verification_bodies("048213", Some("Acme <Labs>"));
        assert!(text.contains("Your verification code for Acme <Labs> is: 048213"));
        assert!(text.contains("valid for 10 minutes"));
        assert!(html.contains("048213"));
        assert!(html.contains("for Acme &lt;Labs&gt; is below"));
        assert!(html.contains("valid for 10 minutes"));
    }
}

use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub smtp: SmtpConfig,
    #[serde(default)]
    pub google: GoogleConfig,
    #[serde(default)]
    pub verification: VerificationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 允许跨域的前端地址，空表示不限制
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expires_in: i64,  // seconds
    pub refresh_token_expires_in: i64, // seconds
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MailBackend {
    #[default]
    Smtp,
    /// 只写日志，不真正发送（本地开发用）
    Console,
}

impl std::str::FromStr for MailBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "smtp" => Ok(MailBackend::Smtp),
            "console" => Ok(MailBackend::Console),
            other => Err(format!("unknown mail backend: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    pub backend: MailBackend,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub use_tls: bool,
    pub use_ssl: bool,
    pub timeout_secs: u64,
    pub from_email: String,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            backend: MailBackend::Smtp,
            host: "smtp.gmail.com".to_string(),
            port: 587,
            username: String::new(),
            password: String::new(),
            use_tls: true,
            use_ssl: false,
            timeout_secs: 30,
            from_email: "no-reply@lazyintern.local".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationConfig {
    /// 验证成功后默认跳转的位置
    pub success_redirect: String,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            success_redirect: "/accounts/login".to_string(),
        }
    }
}

fn env_bool(name: &str) -> Option<bool> {
    env::var(name)
        .ok()
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 尝试读取配置文件，如果不存在则完全依赖环境变量
        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => {
                toml::from_str(&config_str).map_err(|e| format!("Failed to parse config file: {e}"))?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                // 数据库 URL 在无配置文件时必须提供
                let database_url = get_env("DATABASE_URL")
                    .ok_or("DATABASE_URL is not set and no config.toml was found")?;

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                        allowed_origins: Vec::new(),
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                    },
                    jwt: JwtConfig {
                        secret: get_env("JWT_SECRET")
                            .unwrap_or_else(|| "change-me-in-production".to_string()),
                        access_token_expires_in: get_env_parse("JWT_ACCESS_EXPIRES_IN", 7200i64),
                        refresh_token_expires_in: get_env_parse(
                            "JWT_REFRESH_EXPIRES_IN",
                            2_592_000i64,
                        ),
                    },
                    smtp: SmtpConfig::default(),
                    google: GoogleConfig::default(),
                    verification: VerificationConfig::default(),
                }
            }
            Err(e) => {
                return Err(format!("Failed to read config file {config_path}: {e}").into());
            }
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// 环境变量覆盖（即便文件存在时也覆盖）
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            self.server.port = p;
        }
        if let Ok(v) = env::var("CORS_ALLOWED_ORIGINS") {
            self.server.allowed_origins = v
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            self.database.max_connections = mc;
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.jwt.secret = v;
        }
        if let Ok(v) = env::var("JWT_ACCESS_EXPIRES_IN")
            && let Ok(n) = v.parse()
        {
            self.jwt.access_token_expires_in = n;
        }
        if let Ok(v) = env::var("JWT_REFRESH_EXPIRES_IN")
            && let Ok(n) = v.parse()
        {
            self.jwt.refresh_token_expires_in = n;
        }

        // SMTP
        if let Ok(v) = env::var("EMAIL_BACKEND")
            && let Ok(b) = v.parse()
        {
            self.smtp.backend = b;
        }
        if let Ok(v) = env::var("EMAIL_HOST") {
            self.smtp.host = v;
        }
        if let Ok(v) = env::var("EMAIL_PORT")
            && let Ok(p) = v.parse()
        {
            self.smtp.port = p;
        }
        if let Ok(v) = env::var("EMAIL_HOST_USER") {
            self.smtp.username = v;
        }
        if let Ok(v) = env::var("EMAIL_HOST_PASSWORD") {
            self.smtp.password = v;
        }
        if let Some(b) = env_bool("EMAIL_USE_TLS") {
            self.smtp.use_tls = b;
        }
        if let Some(b) = env_bool("EMAIL_USE_SSL") {
            self.smtp.use_ssl = b;
        }
        if let Ok(v) = env::var("EMAIL_TIMEOUT")
            && let Ok(n) = v.parse()
        {
            self.smtp.timeout_secs = n;
        }
        if let Ok(v) = env::var("DEFAULT_FROM_EMAIL") {
            self.smtp.from_email = v;
        } else if self.smtp.from_email.is_empty() && !self.smtp.username.is_empty() {
            self.smtp.from_email = self.smtp.username.clone();
        }

        // Google OAuth
        if let Ok(v) = env::var("GOOGLE_CLIENT_ID") {
            self.google.client_id = v;
        }
        if let Ok(v) = env::var("GOOGLE_CLIENT_SECRET") {
            self.google.client_secret = v;
        }
        if let Ok(v) = env::var("GOOGLE_REDIRECT_URI") {
            self.google.redirect_uri = v;
        }

        if let Ok(v) = env::var("VERIFICATION_SUCCESS_REDIRECT") {
            self.verification.success_redirect = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_toml_uses_defaults() {
        let raw = r#"
            [server]
            host = "127.0.0.1"
            port = 9000

            [database]
            url = "postgres://localhost/lazyintern"
            max_connections = 5

            [jwt]
            secret = "secret"
            access_token_expires_in = 60
            refresh_token_expires_in = 120
        "#;
        let config: Config = toml::from_str(raw).unwrap();
        assert_eq!(config.server.port, 9000);
        assert!(config.server.allowed_origins.is_empty());
        assert_eq!(config.smtp.host, "smtp.gmail.com");
        assert_eq!(config.smtp.port, 587);
        assert!(config.smtp.use_tls);
        assert!(!config.smtp.use_ssl);
        assert_eq!(config.smtp.backend, MailBackend::Smtp);
        assert!(config.google.client_id.is_empty());
        assert_eq!(config.verification.success_redirect, "/accounts/login");
    }

    #[test]
    fn test_mail_backend_from_str() {
        assert_eq!("console".parse::<MailBackend>(), Ok(MailBackend::Console));
        assert_eq!(" SMTP ".parse::<MailBackend>(), Ok(MailBackend::Smtp));
        assert!("django.core.mail".parse::<MailBackend>().is_err());
    }
}

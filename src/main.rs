use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use lazyintern_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    external::{GoogleOAuthService, build_mailer},
    handlers,
    middlewares::{AuthMiddleware, create_cors},
    services::*,
    swagger::swagger_config,
    utils::JwtService,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    // 加载配置
    let config = Config::from_toml().expect("Failed to load configuration file");

    // 创建数据库连接池
    let pool = create_pool(&config.database)
        .await
        .expect("Failed to create database connection pool");

    // 运行数据库迁移
    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    // 创建JWT服务
    let jwt_service = JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expires_in,
        config.jwt.refresh_token_expires_in,
    );

    // 外部服务
    let mailer = build_mailer(&config.smtp).expect("Failed to configure mail transport");
    let google = GoogleOAuthService::new(config.google.clone());
    if !google.is_enabled() {
        log::warn!("GOOGLE_CLIENT_ID is not set, Google login is disabled");
    }

    // 创建服务
    let company_service = CompanyService::new(pool.clone());
    let profile_service = ProfileService::new(pool.clone(), company_service.clone());
    let verification_service = VerificationService::new(
        pool.clone(),
        mailer,
        company_service.clone(),
        config.verification.success_redirect.clone(),
    );
    let auth_service = AuthService::new(
        pool.clone(),
        jwt_service.clone(),
        google,
        company_service.clone(),
        profile_service.clone(),
        verification_service.clone(),
    );

    // 启动HTTP服务器
    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    let allowed_origins = config.server.allowed_origins.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors(&allowed_origins))
            .wrap(AuthMiddleware::new(jwt_service.clone()))
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(company_service.clone()))
            .app_data(web::Data::new(profile_service.clone()))
            .app_data(web::Data::new(verification_service.clone()))
            .configure(swagger_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::auth_config)
                    .configure(handlers::profile_config)
                    .configure(handlers::company_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}

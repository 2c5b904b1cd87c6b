use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use app_api::handlers;
use app_api::middleware::AuthMiddleware;
use app_api::state::ApiState;
use common::config::AppConfig;
use log::warn;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // 读取配置文件，可由第一个命令行参数指定
    let file = std::env::args().nth(1).unwrap_or_else(|| "api-config.toml".to_string());
    AppConfig::init(&file)?;
    let app_cfg = AppConfig::get().ok_or_else(|| anyhow::anyhow!("AppConfig not initialized"))?;
    //初始化日志
    init_log(&app_cfg.get_sys().log_level);

    let state = web::Data::new(ApiState::build(&app_cfg).await?);
    let server = app_cfg.get_server();
    let address_and_port = format!("{}:{}", server.host, server.port);
    warn!("Starting server on {}", address_and_port);
    HttpServer::new(move || {
        App::new()
            .wrap(AuthMiddleware::new(state.clone()))
            .wrap(Logger::default())
            .app_data(state.clone())
            // 配置 控制器
            .configure(handlers::configure)
    })
    .keep_alive(actix_web::http::KeepAlive::Timeout(std::time::Duration::from_secs(600))) // 允许 10 分钟超时
    .bind(address_and_port)?
    .run()
    .await?;
    Ok(())
}

fn init_log(log_level: &str) {
    let mut builder = env_logger::Builder::new();
    builder.parse_filters(log_level);
    if let Err(e) = builder.try_init() {
        eprintln!("logger already initialized: {}", e);
    }
}

pub mod auth_handler;
pub mod chat_handler;
pub mod common_handler;
pub mod friend_request_handler;
pub mod socket_handler;
pub mod swagger;
pub mod user_handler;

use actix_web::web;
use common::errors::AppError;

pub fn configure(cfg: &mut web::ServiceConfig) {
    // 请求体解析失败统一按 400 返回
    cfg.app_data(
        web::JsonConfig::default().error_handler(|err, _req| AppError::Validation(format!("Invalid request body: {}", err)).into()),
    );
    common_handler::configure(cfg);
    swagger::configure(cfg);
    auth_handler::configure(cfg);
    chat_handler::configure(cfg);
    socket_handler::configure(cfg);
    // 好友请求路由须先于 /api/users/{id} 注册
    friend_request_handler::configure(cfg);
    user_handler::configure(cfg);
}

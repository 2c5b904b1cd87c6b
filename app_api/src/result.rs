use biz_service::protocol::account::AccountView;
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

/// 登录 / 注册响应
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub user: AccountView,
    pub token: String,
}

/// 返回当前账号视图
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub success: bool,
    pub user: AccountView,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

pub fn result() -> Value {
    serde_json::json!({"success":true})
}

pub fn result_msg(msg: &str) -> Value {
    serde_json::json!({"success":true,"message":msg})
}

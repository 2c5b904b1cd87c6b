use crate::middleware::CurrentUser;
use crate::result::{TokenResponse, result_msg};
use crate::state::ApiState;
use actix_web::{Responder, get, post, web};
use biz_service::protocol::chat::ChatUserRequest;
use common::errors::AppError;
use validator::Validate;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(chat_token);
    cfg.service(chat_user);
}

#[utoipa::path(
    get,
    path = "/api/chat/token",
    tag = "聊天",
    summary = "聊天/视频平台用户令牌",
    responses((status = 200, description = "成功", body = TokenResponse), (status = 500, description = "平台凭证未配置"))
)]
#[get("/api/chat/token")]
pub async fn chat_token(state: web::Data<ApiState>, user: web::ReqData<CurrentUser>) -> Result<impl Responder, AppError> {
    let token = state.chat.create_user_token(&user.id)?;
    Ok(web::Json(TokenResponse { token }))
}

#[utoipa::path(
    post,
    path = "/api/chat/user",
    tag = "聊天",
    summary = "同步用户到聊天平台",
    request_body = ChatUserRequest,
    responses(
        (status = 200, description = "已创建/更新"),
        (status = 400, description = "缺少 userId"),
        (status = 404, description = "账号不存在"),
        (status = 500, description = "平台调用失败")
    )
)]
#[post("/api/chat/user")]
pub async fn chat_user(state: web::Data<ApiState>, dto: web::Json<ChatUserRequest>) -> Result<impl Responder, AppError> {
    dto.validate()?;
    state.accounts.register_chat_user(dto.user_id.trim()).await?;
    Ok(web::Json(result_msg("Chat user created/updated successfully")))
}

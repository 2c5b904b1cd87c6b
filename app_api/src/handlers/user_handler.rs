use crate::middleware::CurrentUser;
use crate::state::ApiState;
use actix_web::{Responder, get, web};
use biz_service::protocol::account::{AccountProfile, PublicProfile};
use common::errors::AppError;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(user_friends);
    cfg.service(user_recommended);
    cfg.service(user_profile);
}

#[utoipa::path(get, path = "/api/users/friends", tag = "用户", summary = "好友列表", responses((status = 200, description = "成功", body = Vec<PublicProfile>)))]
#[get("/api/users/friends")]
pub async fn user_friends(state: web::Data<ApiState>, user: web::ReqData<CurrentUser>) -> Result<impl Responder, AppError> {
    Ok(web::Json(state.accounts.friends(&user.id).await?))
}

#[utoipa::path(
    get,
    path = "/api/users/recommended",
    tag = "用户",
    summary = "推荐语伴",
    description = "已完成引导、非本人且非好友的用户",
    responses((status = 200, description = "成功", body = Vec<PublicProfile>))
)]
#[get("/api/users/recommended")]
pub async fn user_recommended(state: web::Data<ApiState>, user: web::ReqData<CurrentUser>) -> Result<impl Responder, AppError> {
    Ok(web::Json(state.accounts.recommend(&user.id).await?))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "用户",
    summary = "用户公开资料",
    params(("id" = String, Path, description = "用户 ID")),
    responses((status = 200, description = "成功", body = AccountProfile), (status = 404, description = "用户不存在"))
)]
#[get("/api/users/{id}")]
pub async fn user_profile(state: web::Data<ApiState>, path: web::Path<String>) -> Result<impl Responder, AppError> {
    Ok(web::Json(state.accounts.get_public_profile(&path.into_inner()).await?))
}

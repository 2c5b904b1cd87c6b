use crate::middleware::CurrentUser;
use crate::result::result_msg;
use crate::state::ApiState;
use actix_web::{HttpResponse, Responder, get, post, put, web};
use biz_service::protocol::friend_request::{FriendRequestView, FriendRequestsView, OutgoingFriendRequest};
use common::errors::AppError;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(friend_request_list);
    cfg.service(friend_request_outgoing);
    cfg.service(friend_request_send);
    cfg.service(friend_request_accept);
}

#[utoipa::path(
    get,
    path = "/api/users/friend-requests",
    tag = "好友请求",
    summary = "收到的待处理请求与已通过的请求",
    responses((status = 200, description = "成功", body = FriendRequestsView))
)]
#[get("/api/users/friend-requests")]
pub async fn friend_request_list(state: web::Data<ApiState>, user: web::ReqData<CurrentUser>) -> Result<impl Responder, AppError> {
    Ok(web::Json(state.friend_requests.friend_requests(&user.id).await?))
}

#[utoipa::path(
    get,
    path = "/api/users/outgoing-friend-requests",
    tag = "好友请求",
    summary = "已发出的待处理请求",
    responses((status = 200, description = "成功", body = Vec<OutgoingFriendRequest>))
)]
#[get("/api/users/outgoing-friend-requests")]
pub async fn friend_request_outgoing(state: web::Data<ApiState>, user: web::ReqData<CurrentUser>) -> Result<impl Responder, AppError> {
    Ok(web::Json(state.friend_requests.list_outgoing(&user.id).await?))
}

#[utoipa::path(
    post,
    path = "/api/users/friend-request/{id}",
    tag = "好友请求",
    summary = "发送好友请求",
    params(("id" = String, Path, description = "接收方用户 ID")),
    responses(
        (status = 201, description = "已创建", body = FriendRequestView),
        (status = 400, description = "不能向自己发送"),
        (status = 404, description = "接收方不存在"),
        (status = 409, description = "已是好友或请求已存在")
    )
)]
#[post("/api/users/friend-request/{id}")]
pub async fn friend_request_send(
    state: web::Data<ApiState>,
    user: web::ReqData<CurrentUser>,
    path: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let request = state.friend_requests.send_request(&user.id, &path.into_inner()).await?;
    Ok(HttpResponse::Created().json(request))
}

#[utoipa::path(
    put,
    path = "/api/users/friend-request/{id}/accept",
    tag = "好友请求",
    summary = "接受好友请求",
    params(("id" = String, Path, description = "好友请求 ID")),
    responses(
        (status = 200, description = "已接受"),
        (status = 400, description = "请求不存在"),
        (status = 403, description = "非接收方"),
        (status = 409, description = "请求已处理")
    )
)]
#[put("/api/users/friend-request/{id}/accept")]
pub async fn friend_request_accept(
    state: web::Data<ApiState>,
    user: web::ReqData<CurrentUser>,
    path: web::Path<String>,
) -> Result<impl Responder, AppError> {
    state.friend_requests.accept_request(&path.into_inner(), &user.id).await.map_err(|e| match e {
        AppError::NotFound(msg) => AppError::Validation(msg),
        other => other,
    })?;
    Ok(web::Json(result_msg("Friend request accepted")))
}

use crate::handlers::auth_handler::*;
use crate::handlers::chat_handler::*;
use crate::handlers::friend_request_handler::*;
use crate::handlers::user_handler::*;
use crate::result::{AuthResponse, TokenResponse, UserResponse};
use actix_web::{HttpResponse, get, web};
use biz_service::entitys::friend_request_entity::FriendRequestStatus;
use biz_service::protocol::account::{AccountProfile, AccountView, LoginRequest, OnboardRequest, PublicProfile, SignupRequest};
use biz_service::protocol::chat::ChatUserRequest;
use biz_service::protocol::friend_request::{
    AcceptedFriendRequest, FriendRequestView, FriendRequestsView, IncomingFriendRequest, OutgoingFriendRequest,
};
use common::errors::AppError;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        //认证
        auth_signup,
        auth_login,
        auth_logout,
        auth_onboarding,
        auth_me,

        //用户
        user_friends,
        user_recommended,
        user_profile,

        //好友请求
        friend_request_list,
        friend_request_outgoing,
        friend_request_send,
        friend_request_accept,

        //聊天
        chat_token,
        chat_user,
    ),
    components(schemas(
        SignupRequest,
        LoginRequest,
        OnboardRequest,
        PublicProfile,
        AccountProfile,
        AccountView,
        AuthResponse,
        UserResponse,
        TokenResponse,
        ChatUserRequest,
        FriendRequestStatus,
        FriendRequestView,
        IncomingFriendRequest,
        OutgoingFriendRequest,
        AcceptedFriendRequest,
        FriendRequestsView,
    )),
    tags(
        (name = "language-exchange-api", description = "语言交换社交后端")
    )
)]
struct ApiDoc;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(openapi_json);
}

#[get("/openapi.json")]
async fn openapi_json() -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().content_type("application/json").body(ApiDoc::openapi().to_json()?))
}

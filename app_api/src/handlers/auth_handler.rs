use crate::middleware::CurrentUser;
use crate::result::{AuthResponse, UserResponse, result_msg};
use crate::state::ApiState;
use actix_web::{HttpResponse, Responder, get, post, web};
use biz_service::protocol::account::{LoginRequest, OnboardRequest, SignupRequest};
use common::errors::AppError;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(auth_signup);
    cfg.service(auth_login);
    cfg.service(auth_logout);
    cfg.service(auth_onboarding);
    cfg.service(auth_me);
}

#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "认证",
    summary = "注册",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "注册成功，同时写入 jwt cookie", body = AuthResponse),
        (status = 400, description = "字段校验失败或邮箱已存在")
    )
)]
#[post("/api/auth/signup")]
pub async fn auth_signup(state: web::Data<ApiState>, dto: web::Json<SignupRequest>) -> Result<impl Responder, AppError> {
    let (user, token) = state.accounts.signup(&dto).await?;
    Ok(HttpResponse::Created().cookie(state.session_cookie(&token)).json(AuthResponse { success: true, user, token }))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "认证",
    summary = "登录",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "登录成功", body = AuthResponse),
        (status = 401, description = "邮箱或密码错误")
    )
)]
#[post("/api/auth/login")]
pub async fn auth_login(state: web::Data<ApiState>, dto: web::Json<LoginRequest>) -> Result<impl Responder, AppError> {
    let (user, token) = state.accounts.login(&dto).await?;
    Ok(HttpResponse::Ok().cookie(state.session_cookie(&token)).json(AuthResponse { success: true, user, token }))
}

#[utoipa::path(post, path = "/api/auth/logout", tag = "认证", summary = "退出登录", responses((status = 200, description = "已清除 cookie")))]
#[post("/api/auth/logout")]
pub async fn auth_logout(state: web::Data<ApiState>) -> impl Responder {
    HttpResponse::Ok().cookie(state.cleared_cookie()).json(result_msg("Logout successful"))
}

#[utoipa::path(
    post,
    path = "/api/auth/onboarding",
    tag = "认证",
    summary = "完善资料",
    request_body = OnboardRequest,
    responses(
        (status = 200, description = "成功", body = UserResponse),
        (status = 400, description = "缺少字段")
    )
)]
#[post("/api/auth/onboarding")]
pub async fn auth_onboarding(
    state: web::Data<ApiState>,
    user: web::ReqData<CurrentUser>,
    dto: web::Json<OnboardRequest>,
) -> Result<impl Responder, AppError> {
    let user = state.accounts.onboard(&user.id, &dto).await?;
    Ok(web::Json(UserResponse { success: true, user }))
}

#[utoipa::path(get, path = "/api/auth/me", tag = "认证", summary = "当前用户", responses((status = 200, description = "成功", body = UserResponse)))]
#[get("/api/auth/me")]
pub async fn auth_me(state: web::Data<ApiState>, user: web::ReqData<CurrentUser>) -> Result<impl Responder, AppError> {
    let user = state.accounts.me(&user.id).await?;
    Ok(web::Json(UserResponse { success: true, user }))
}

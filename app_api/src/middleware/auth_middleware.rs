use crate::state::{ApiState, SESSION_COOKIE};
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, ResponseError,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    web,
};
use common::UserId;
use common::errors::AppError;
use futures_util::future::{LocalBoxFuture, Ready, ok};
use log::debug;
use std::rc::Rc;
use std::task::{Context, Poll};

/// 无需登录即可访问的路径
const PUBLIC_PATHS: [&str; 5] = ["/api/auth/signup", "/api/auth/login", "/api/auth/logout", "/status", "/openapi.json"];

/// 已认证的调用方，由中间件写入请求扩展
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: UserId,
}

/// 会话认证中间件：`jwt` cookie 或 `Authorization: Bearer <token>`
pub struct AuthMiddleware {
    state: web::Data<ApiState>,
}

impl AuthMiddleware {
    pub fn new(state: web::Data<ApiState>) -> Self {
        Self { state }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService { service: Rc::new(service), state: self.state.clone() })
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    state: web::Data<ApiState>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = Rc::clone(&self.service);
        let state = self.state.clone();

        Box::pin(async move {
            if PUBLIC_PATHS.contains(&req.path()) {
                let res = srv.call(req).await?;
                return Ok(res.map_into_left_body());
            }

            let resolved = match session_token(&req) {
                Some(token) => state.accounts.resolve_session(&token).await,
                None => Err(AppError::Unauthorized("Unauthorized - No token provided".to_string())),
            };
            match resolved {
                Ok(account) => {
                    req.extensions_mut().insert(CurrentUser { id: account.id });
                    let res = srv.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(e) => {
                    debug!("rejected {} {}: {}", req.method(), req.path(), e);
                    let response = e.error_response().map_into_right_body();
                    Ok(req.into_response(response))
                }
            }
        })
    }
}

fn session_token(req: &ServiceRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }
    req.headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

use actix_web::cookie::time::Duration;
use actix_web::cookie::{Cookie, SameSite};
use biz_service::biz_service::account_service::AccountService;
use biz_service::biz_service::auth_service::AuthService;
use biz_service::biz_service::chat_token_service::ChatTokenService;
use biz_service::biz_service::friend_request_service::FriendRequestService;
use biz_service::chat_platform::{ChatPlatform, StreamChatClient};
use biz_service::relay::SocketRelay;
use biz_service::store::{AccountStore, FriendRequestStore, MemoryStore, MongoStore};
use common::config::{AppConfig, StorageEngine, StreamConfig, SysConfig};
use common::db::init_db;
use log::{info, warn};
use std::sync::Arc;

pub const SESSION_COOKIE: &str = "jwt";

/// 请求处理器共享的服务集合
pub struct ApiState {
    pub accounts: Arc<AccountService>,
    pub friend_requests: Arc<FriendRequestService>,
    pub chat: Arc<ChatTokenService>,
    pub relay: Arc<SocketRelay>,
    session_ttl_secs: i64,
    cookie_secure: bool,
}

impl ApiState {
    /// 按配置选择存储引擎并组装服务
    pub async fn build(config: &AppConfig) -> anyhow::Result<Self> {
        let database = config.get_database();
        let stream = config.get_stream();
        if stream.api_key.is_empty() || stream.api_secret.is_empty() {
            warn!("chat platform credentials missing, chat user sync will fail");
        }
        let chat: Arc<dyn ChatPlatform> = Arc::new(StreamChatClient::new(&stream)?);
        match database.engine {
            StorageEngine::Mongo => {
                let db = init_db(&database).await?;
                let store = Arc::new(MongoStore::new(&db));
                store.ensure_indexes().await?;
                info!("storage engine: mongo ({})", database.db_name);
                Self::assemble(store.clone(), store, chat, &config.get_sys(), &stream)
            }
            StorageEngine::Memory => {
                warn!("storage engine: memory, data is lost on restart");
                Self::in_memory(&config.get_sys(), &stream, chat)
            }
        }
    }

    pub fn in_memory(sys: &SysConfig, stream: &StreamConfig, chat: Arc<dyn ChatPlatform>) -> anyhow::Result<Self> {
        let store = Arc::new(MemoryStore::new());
        Self::assemble(store.clone(), store, chat, sys, stream)
    }

    fn assemble(
        accounts: Arc<dyn AccountStore>,
        requests: Arc<dyn FriendRequestStore>,
        chat: Arc<dyn ChatPlatform>,
        sys: &SysConfig,
        stream: &StreamConfig,
    ) -> anyhow::Result<Self> {
        let auth = Arc::new(AuthService::new(&sys.jwt_secret, sys.token_expire_days, sys.bcrypt_cost)?);
        let relay = Arc::new(SocketRelay::new());
        Ok(Self {
            accounts: Arc::new(AccountService::new(accounts.clone(), auth.clone(), chat)),
            friend_requests: Arc::new(FriendRequestService::new(accounts, requests, relay.clone())),
            chat: Arc::new(ChatTokenService::new(&stream.api_secret)),
            relay,
            session_ttl_secs: auth.token_ttl_secs(),
            cookie_secure: sys.cookie_secure,
        })
    }

    pub fn session_cookie(&self, token: &str) -> Cookie<'static> {
        Cookie::build(SESSION_COOKIE, token.to_string())
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(self.cookie_secure)
            .max_age(Duration::seconds(self.session_ttl_secs))
            .finish()
    }

    pub fn cleared_cookie(&self) -> Cookie<'static> {
        let mut cookie = Cookie::build(SESSION_COOKIE, "").path("/").finish();
        cookie.make_removal();
        cookie
    }
}

use crate::biz_service::auth_service::AuthService;
use crate::chat_platform::ChatPlatform;
use crate::entitys::account_entity::AccountEntity;
use crate::protocol::account::{AccountProfile, AccountView, LoginRequest, OnboardRequest, PublicProfile, SignupRequest};
use crate::store::AccountStore;
use common::UserId;
use common::errors::{AppError, AppResult};
use common::util::common_utils::build_id;
use common::util::date_util::now_millis;
use log::{info, warn};
use rand::Rng;
use std::sync::Arc;
use validator::Validate;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// 用户目录：注册、登录、资料引导、推荐与好友查询
pub struct AccountService {
    accounts: Arc<dyn AccountStore>,
    auth: Arc<AuthService>,
    chat: Arc<dyn ChatPlatform>,
}

impl AccountService {
    pub fn new(accounts: Arc<dyn AccountStore>, auth: Arc<AuthService>, chat: Arc<dyn ChatPlatform>) -> Self {
        Self { accounts, auth, chat }
    }

    /// 注册并签发会话令牌
    pub async fn signup(&self, req: &SignupRequest) -> AppResult<(AccountView, String)> {
        req.validate()?;
        let email = req.email.trim().to_lowercase();
        if self.accounts.find_account_by_email(&email).await?.is_some() {
            return Err(AppError::Validation("email already exists, use a different email".to_string()));
        }

        let now = now_millis();
        let avatar = rand::rng().random_range(1..=100);
        let account = AccountEntity {
            id: build_id(),
            full_name: req.full_name.trim().to_string(),
            email,
            password: self.auth.hash_password(&req.password).await?,
            profile_pic: format!("https://avatar.iran.liara.run/public/{}.png", avatar),
            created_at: now,
            updated_at: now,
            ..Default::default()
        };
        match self.accounts.insert_account(&account).await {
            Ok(()) => {}
            Err(AppError::Conflict(_)) => {
                return Err(AppError::Validation("email already exists, use a different email".to_string()));
            }
            Err(e) => return Err(e),
        }

        let token = self.auth.issue_token(&account.id)?;
        info!("account created: id={}", account.id);
        Ok((AccountView::from(&account), token))
    }

    /// 邮箱 + 密码登录
    pub async fn login(&self, req: &LoginRequest) -> AppResult<(AccountView, String)> {
        req.validate()?;
        let email = req.email.trim().to_lowercase();
        let Some(account) = self.accounts.find_account_by_email(&email).await? else {
            info!("login rejected: unknown email");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };
        if !self.auth.verify_password(&req.password, &account.password).await? {
            info!("login rejected: password mismatch for {}", account.id);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }
        let token = self.auth.issue_token(&account.id)?;
        self.sync_chat_user(&account).await;
        Ok((AccountView::from(&account), token))
    }

    /// 校验令牌并加载账号；账号已不存在时同样视为未认证
    pub async fn resolve_session(&self, token: &str) -> AppResult<AccountEntity> {
        let claims = self.auth.verify_token(token)?;
        match self.accounts.find_account(&claims.user_id).await? {
            Some(account) => Ok(account),
            None => {
                warn!("session token for missing account {}", claims.user_id);
                Err(AppError::Unauthorized("User not found".to_string()))
            }
        }
    }

    pub async fn onboard(&self, uid: &str, req: &OnboardRequest) -> AppResult<AccountView> {
        req.validate()?;
        let account = self
            .accounts
            .complete_onboarding(uid, req, now_millis())
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        info!("account onboarded: id={}", uid);
        self.sync_chat_user(&account).await;
        Ok(AccountView::from(&account))
    }

    /// 显式同步到聊天平台；账号不存在为 404，平台失败为 500
    pub async fn register_chat_user(&self, uid: &str) -> AppResult<()> {
        let account = self.load(uid).await?;
        self.chat
            .upsert_user(&account.id, &account.full_name, &account.profile_pic)
            .await
            .map_err(|e| AppError::Internal(format!("chat platform upsert: {}", e)))?;
        info!("chat user synced: id={}", uid);
        Ok(())
    }

    pub async fn me(&self, uid: &str) -> AppResult<AccountView> {
        Ok(AccountView::from(&self.load(uid).await?))
    }

    pub async fn get_public_profile(&self, uid: &str) -> AppResult<AccountProfile> {
        Ok(AccountProfile::from(&self.load(uid).await?))
    }

    /// 推荐：非本人、非好友、已完成引导
    pub async fn recommend(&self, uid: &str) -> AppResult<Vec<PublicProfile>> {
        let me = self.load(uid).await?;
        let mut excluded: Vec<UserId> = me.friends.clone();
        excluded.push(me.id.clone());
        let found = self.accounts.find_onboarded_excluding(&excluded).await?;
        Ok(found.iter().map(PublicProfile::from).collect())
    }

    /// 好友资料，按好友集合顺序
    pub async fn friends(&self, uid: &str) -> AppResult<Vec<PublicProfile>> {
        let me = self.load(uid).await?;
        let found = self.accounts.find_accounts(&me.friends).await?;
        let mut profiles = Vec::with_capacity(found.len());
        for friend_id in &me.friends {
            match found.iter().find(|a| &a.id == friend_id) {
                Some(account) => profiles.push(PublicProfile::from(account)),
                None => warn!("friend {} of {} no longer exists", friend_id, uid),
            }
        }
        Ok(profiles)
    }

    // 登录 / 引导时顺带同步，失败不影响主流程
    async fn sync_chat_user(&self, account: &AccountEntity) {
        if let Err(e) = self.chat.upsert_user(&account.id, &account.full_name, &account.profile_pic).await {
            warn!("chat platform upsert failed for {}: {}", account.id, e);
        }
    }

    async fn load(&self, uid: &str) -> AppResult<AccountEntity> {
        self.accounts.find_account(uid).await?.ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}

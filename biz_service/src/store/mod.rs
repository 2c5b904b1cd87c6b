pub mod memory_store;
pub mod mongo_store;

use crate::entitys::account_entity::AccountEntity;
use crate::entitys::friend_request_entity::FriendRequestEntity;
use crate::protocol::account::OnboardRequest;
use async_trait::async_trait;
use common::UserId;
use common::errors::AppResult;

pub use memory_store::MemoryStore;
pub use mongo_store::MongoStore;

/// 好友请求查询条件，排序由存储实现负责
#[derive(Debug, Clone, Copy)]
pub enum RequestQuery<'a> {
    /// recipient = uid 且 pending，按创建时间升序
    IncomingPending(&'a str),
    /// sender = uid 且 pending，按创建时间降序
    OutgoingPending(&'a str),
    /// 任一方 = uid 且 accepted，按更新时间降序
    AcceptedInvolving(&'a str),
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// 邮箱重复返回 `Conflict`
    async fn insert_account(&self, account: &AccountEntity) -> AppResult<()>;
    async fn find_account(&self, id: &str) -> AppResult<Option<AccountEntity>>;
    async fn find_account_by_email(&self, email: &str) -> AppResult<Option<AccountEntity>>;
    async fn find_accounts(&self, ids: &[UserId]) -> AppResult<Vec<AccountEntity>>;
    /// 已完成引导且不在 `excluded` 中的账号
    async fn find_onboarded_excluding(&self, excluded: &[UserId]) -> AppResult<Vec<AccountEntity>>;
    /// 写入引导资料并标记 `is_onboarded`，账号不存在返回 `None`
    async fn complete_onboarding(&self, id: &str, profile: &OnboardRequest, updated_at: i64)
    -> AppResult<Option<AccountEntity>>;
}

#[async_trait]
pub trait FriendRequestStore: Send + Sync {
    /// 同一无序用户对已存在记录时返回 `Conflict`
    async fn insert_request(&self, request: &FriendRequestEntity) -> AppResult<()>;
    async fn find_request(&self, id: &str) -> AppResult<Option<FriendRequestEntity>>;
    async fn find_request_between(&self, a: &str, b: &str) -> AppResult<Option<FriendRequestEntity>>;
    async fn find_requests(&self, query: RequestQuery<'_>) -> AppResult<Vec<FriendRequestEntity>>;
    /// 原子地完成 pending → accepted 并互加好友；状态已非 pending 时返回 `Conflict`
    async fn accept_request(&self, request: &FriendRequestEntity, accepted_at: i64) -> AppResult<()>;
}

use crate::entitys::account_entity::AccountEntity;
use crate::entitys::friend_request_entity::{FriendRequestEntity, FriendRequestStatus};
use crate::protocol::account::OnboardRequest;
use crate::store::{AccountStore, FriendRequestStore, RequestQuery};
use async_trait::async_trait;
use common::UserId;
use common::errors::{AppError, AppResult};
use std::cmp::Reverse;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Tables {
    accounts: HashMap<UserId, AccountEntity>,
    requests: HashMap<String, FriendRequestEntity>,
}

/// 进程内存储，单把读写锁覆盖两张表，
/// 唯一性检查与接受请求的三处写入都在同一临界区内完成
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn insert_account(&self, account: &AccountEntity) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if tables.accounts.values().any(|a| a.email == account.email) {
            return Err(AppError::Conflict("email already exists".to_string()));
        }
        if tables.accounts.contains_key(&account.id) {
            return Err(AppError::Conflict("account id already exists".to_string()));
        }
        tables.accounts.insert(account.id.clone(), account.clone());
        Ok(())
    }

    async fn find_account(&self, id: &str) -> AppResult<Option<AccountEntity>> {
        Ok(self.tables.read().await.accounts.get(id).cloned())
    }

    async fn find_account_by_email(&self, email: &str) -> AppResult<Option<AccountEntity>> {
        Ok(self.tables.read().await.accounts.values().find(|a| a.email == email).cloned())
    }

    async fn find_accounts(&self, ids: &[UserId]) -> AppResult<Vec<AccountEntity>> {
        let tables = self.tables.read().await;
        Ok(ids.iter().filter_map(|id| tables.accounts.get(id).cloned()).collect())
    }

    async fn find_onboarded_excluding(&self, excluded: &[UserId]) -> AppResult<Vec<AccountEntity>> {
        let tables = self.tables.read().await;
        let mut found: Vec<AccountEntity> = tables
            .accounts
            .values()
            .filter(|a| a.is_onboarded && !excluded.contains(&a.id))
            .cloned()
            .collect();
        found.sort_by_key(|a| Reverse(a.created_at));
        Ok(found)
    }

    async fn complete_onboarding(&self, id: &str, profile: &OnboardRequest, updated_at: i64) -> AppResult<Option<AccountEntity>> {
        let mut tables = self.tables.write().await;
        let Some(account) = tables.accounts.get_mut(id) else {
            return Ok(None);
        };
        account.full_name = profile.full_name.trim().to_string();
        account.bio = profile.bio.trim().to_string();
        account.native_language = profile.native_language.trim().to_string();
        account.learning_language = profile.learning_language.trim().to_string();
        account.location = profile.location.trim().to_string();
        account.is_onboarded = true;
        account.updated_at = updated_at;
        Ok(Some(account.clone()))
    }
}

#[async_trait]
impl FriendRequestStore for MemoryStore {
    async fn insert_request(&self, request: &FriendRequestEntity) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if tables.requests.values().any(|r| r.pair_key == request.pair_key) {
            return Err(AppError::Conflict("a friend request already exists".to_string()));
        }
        tables.requests.insert(request.id.clone(), request.clone());
        Ok(())
    }

    async fn find_request(&self, id: &str) -> AppResult<Option<FriendRequestEntity>> {
        Ok(self.tables.read().await.requests.get(id).cloned())
    }

    async fn find_request_between(&self, a: &str, b: &str) -> AppResult<Option<FriendRequestEntity>> {
        let key = common::util::common_utils::pair_key(a, b);
        Ok(self.tables.read().await.requests.values().find(|r| r.pair_key == key).cloned())
    }

    async fn find_requests(&self, query: RequestQuery<'_>) -> AppResult<Vec<FriendRequestEntity>> {
        let tables = self.tables.read().await;
        let all = tables.requests.values();
        let mut found: Vec<FriendRequestEntity> = match query {
            RequestQuery::IncomingPending(uid) => all.filter(|r| r.recipient_id == uid && r.is_pending()).cloned().collect(),
            RequestQuery::OutgoingPending(uid) => all.filter(|r| r.sender_id == uid && r.is_pending()).cloned().collect(),
            RequestQuery::AcceptedInvolving(uid) => {
                all.filter(|r| r.involves(uid) && r.status == FriendRequestStatus::Accepted).cloned().collect()
            }
        };
        match query {
            RequestQuery::IncomingPending(_) => found.sort_by_key(|r| r.created_at),
            RequestQuery::OutgoingPending(_) => found.sort_by_key(|r| Reverse(r.created_at)),
            RequestQuery::AcceptedInvolving(_) => found.sort_by_key(|r| Reverse(r.updated_at)),
        }
        Ok(found)
    }

    async fn accept_request(&self, request: &FriendRequestEntity, accepted_at: i64) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.accounts.contains_key(&request.sender_id) || !tables.accounts.contains_key(&request.recipient_id) {
            return Err(AppError::NotFound("account not found".to_string()));
        }
        let Some(stored) = tables.requests.get_mut(&request.id) else {
            return Err(AppError::NotFound("friend request not found".to_string()));
        };
        if !stored.is_pending() {
            return Err(AppError::Conflict("friend request is not pending".to_string()));
        }
        stored.status = FriendRequestStatus::Accepted;
        stored.updated_at = accepted_at;

        for (owner, friend) in [(&request.sender_id, &request.recipient_id), (&request.recipient_id, &request.sender_id)] {
            if let Some(account) = tables.accounts.get_mut(owner) {
                account.add_friend(friend);
                account.updated_at = accepted_at;
            }
        }
        Ok(())
    }
}

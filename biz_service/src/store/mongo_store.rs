use crate::entitys::account_entity::AccountEntity;
use crate::entitys::friend_request_entity::{FriendRequestEntity, FriendRequestStatus};
use crate::protocol::account::OnboardRequest;
use crate::store::{AccountStore, FriendRequestStore, RequestQuery};
use async_trait::async_trait;
use common::UserId;
use common::errors::{AppError, AppResult};
use common::repository_util::{BaseRepository, OrderType, Repository, is_duplicate_key};
use common::util::common_utils::pair_key;
use log::{info, warn};
use mongodb::bson::doc;
use mongodb::{Client, ClientSession, Database};

/// MongoDB 存储：`account` 与 `friend_request` 两个集合
#[derive(Debug)]
pub struct MongoStore {
    client: Client,
    accounts: BaseRepository<AccountEntity>,
    requests: BaseRepository<FriendRequestEntity>,
}

impl MongoStore {
    pub fn new(db: &Database) -> Self {
        Self {
            client: db.client().clone(),
            accounts: BaseRepository::new(db.collection("account")),
            requests: BaseRepository::new(db.collection("friend_request")),
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        self.accounts.ensure_indexes().await?;
        self.requests.ensure_indexes().await?;
        info!("mongo indexes ensured for account, friend_request");
        Ok(())
    }

    async fn apply_accept(&self, session: &mut ClientSession, request: &FriendRequestEntity, accepted_at: i64) -> AppResult<()> {
        let matched = self
            .requests
            .update_one_in_session(
                session,
                doc! { "_id": request.id.as_str(), "status": FriendRequestStatus::Pending.as_ref() },
                doc! { "$set": { "status": FriendRequestStatus::Accepted.as_ref(), "updated_at": accepted_at } },
            )
            .await?;
        if matched == 0 {
            return Err(AppError::Conflict("friend request is not pending".to_string()));
        }

        for (owner, friend) in [(&request.sender_id, &request.recipient_id), (&request.recipient_id, &request.sender_id)] {
            let matched = self
                .accounts
                .update_one_in_session(
                    session,
                    doc! { "_id": owner.as_str() },
                    doc! { "$addToSet": { "friends": friend.as_str() }, "$set": { "updated_at": accepted_at } },
                )
                .await?;
            if matched == 0 {
                return Err(AppError::NotFound(format!("account {} no longer exists", owner)));
            }
        }
        Ok(())
    }
}

/// 唯一索引冲突映射为 Conflict，其余保持数据库错误
fn insert_error(err: mongodb::error::Error, conflict: &str) -> AppError {
    if is_duplicate_key(&err) { AppError::Conflict(conflict.to_string()) } else { err.into() }
}

#[async_trait]
impl AccountStore for MongoStore {
    async fn insert_account(&self, account: &AccountEntity) -> AppResult<()> {
        match self.accounts.insert(account).await {
            Ok(()) => Ok(()),
            Err(e) => Err(insert_error(e, "email already exists")),
        }
    }

    async fn find_account(&self, id: &str) -> AppResult<Option<AccountEntity>> {
        Ok(self.accounts.find_by_id(id).await?)
    }

    async fn find_account_by_email(&self, email: &str) -> AppResult<Option<AccountEntity>> {
        Ok(self.accounts.find_one(doc! { "email": email }).await?)
    }

    async fn find_accounts(&self, ids: &[UserId]) -> AppResult<Vec<AccountEntity>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        Ok(self.accounts.query(doc! { "_id": { "$in": ids.to_vec() } }).await?)
    }

    async fn find_onboarded_excluding(&self, excluded: &[UserId]) -> AppResult<Vec<AccountEntity>> {
        let filter = doc! { "_id": { "$nin": excluded.to_vec() }, "is_onboarded": true };
        Ok(self.accounts.query_sorted(filter, "created_at", OrderType::Desc).await?)
    }

    async fn complete_onboarding(&self, id: &str, profile: &OnboardRequest, updated_at: i64) -> AppResult<Option<AccountEntity>> {
        let update = doc! {
            "$set": {
                "full_name": profile.full_name.trim(),
                "bio": profile.bio.trim(),
                "native_language": profile.native_language.trim(),
                "learning_language": profile.learning_language.trim(),
                "location": profile.location.trim(),
                "is_onboarded": true,
                "updated_at": updated_at,
            }
        };
        Ok(self.accounts.find_one_and_update(doc! { "_id": id }, update).await?)
    }
}

#[async_trait]
impl FriendRequestStore for MongoStore {
    async fn insert_request(&self, request: &FriendRequestEntity) -> AppResult<()> {
        match self.requests.insert(request).await {
            Ok(()) => Ok(()),
            Err(e) => Err(insert_error(e, "a friend request already exists")),
        }
    }

    async fn find_request(&self, id: &str) -> AppResult<Option<FriendRequestEntity>> {
        Ok(self.requests.find_by_id(id).await?)
    }

    async fn find_request_between(&self, a: &str, b: &str) -> AppResult<Option<FriendRequestEntity>> {
        Ok(self.requests.find_one(doc! { "pair_key": pair_key(a, b) }).await?)
    }

    async fn find_requests(&self, query: RequestQuery<'_>) -> AppResult<Vec<FriendRequestEntity>> {
        let pending = FriendRequestStatus::Pending.as_ref();
        let accepted = FriendRequestStatus::Accepted.as_ref();
        let found = match query {
            RequestQuery::IncomingPending(uid) => {
                self.requests
                    .query_sorted(doc! { "recipient_id": uid, "status": pending }, "created_at", OrderType::Asc)
                    .await?
            }
            RequestQuery::OutgoingPending(uid) => {
                self.requests
                    .query_sorted(doc! { "sender_id": uid, "status": pending }, "created_at", OrderType::Desc)
                    .await?
            }
            RequestQuery::AcceptedInvolving(uid) => {
                let filter = doc! {
                    "$or": [ { "sender_id": uid }, { "recipient_id": uid } ],
                    "status": accepted,
                };
                self.requests.query_sorted(filter, "updated_at", OrderType::Desc).await?
            }
        };
        Ok(found)
    }

    async fn accept_request(&self, request: &FriendRequestEntity, accepted_at: i64) -> AppResult<()> {
        let mut session = self.client.start_session().await?;
        session.start_transaction().await?;
        match self.apply_accept(&mut session, request, accepted_at).await {
            Ok(()) => {
                session.commit_transaction().await?;
                Ok(())
            }
            Err(e) => {
                if let Err(abort_err) = session.abort_transaction().await {
                    warn!("abort accept transaction for {} failed: {}", request.id, abort_err);
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::from_document;
    use mongodb::error::{ErrorKind, WriteError, WriteFailure};

    fn write_error(code: i32) -> mongodb::error::Error {
        let write_error: WriteError =
            from_document(doc! { "code": code, "codeName": "DuplicateKey", "errmsg": "E11000 duplicate key error" }).unwrap();
        mongodb::error::Error::from(ErrorKind::Write(WriteFailure::WriteError(write_error)))
    }

    #[test]
    fn duplicate_insert_becomes_conflict() {
        match insert_error(write_error(11000), "email already exists") {
            AppError::Conflict(msg) => assert_eq!(msg, "email already exists"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn other_insert_failures_stay_database_errors() {
        assert!(matches!(insert_error(write_error(121), "email already exists"), AppError::Mongo(_)));
        let io = mongodb::error::Error::from(std::io::Error::other("connection reset"));
        assert!(matches!(insert_error(io, "email already exists"), AppError::Mongo(_)));
    }
}

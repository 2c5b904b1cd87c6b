use crate::entitys::account_entity::AccountEntity;
use crate::entitys::friend_request_entity::{FriendRequestEntity, FriendRequestStatus};
use crate::protocol::account::PublicProfile;
use crate::protocol::friend_request::{
    AcceptedFriendRequest, FriendRequestView, FriendRequestsView, IncomingFriendRequest, OutgoingFriendRequest,
};
use crate::protocol::relay_event::{FriendRequestNotice, RelayEvent};
use crate::relay::{NotificationRelay, RelayError};
use crate::store::{AccountStore, FriendRequestStore, RequestQuery};
use common::UserId;
use common::errors::{AppError, AppResult};
use common::util::date_util::now_millis;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::Arc;

/// 好友请求台账：创建、接受、按方向查询
pub struct FriendRequestService {
    accounts: Arc<dyn AccountStore>,
    requests: Arc<dyn FriendRequestStore>,
    relay: Arc<dyn NotificationRelay>,
}

impl FriendRequestService {
    pub fn new(accounts: Arc<dyn AccountStore>, requests: Arc<dyn FriendRequestStore>, relay: Arc<dyn NotificationRelay>) -> Self {
        Self { accounts, requests, relay }
    }

    /// 发送好友请求
    ///
    /// 写入成功后向接收方推送 `friendRequest`，推送失败只记录日志。
    pub async fn send_request(&self, sender_id: &str, recipient_id: &str) -> AppResult<FriendRequestView> {
        if sender_id == recipient_id {
            return Err(AppError::Validation("You can't send friend request to yourself".to_string()));
        }
        let sender = self
            .accounts
            .find_account(sender_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        let recipient = self
            .accounts
            .find_account(recipient_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Recipient not found".to_string()))?;

        if sender.is_friend_of(recipient_id) || recipient.is_friend_of(sender_id) {
            return Err(AppError::Conflict("You are already friends with this user".to_string()));
        }
        if self.requests.find_request_between(sender_id, recipient_id).await?.is_some() {
            return Err(AppError::Conflict("A friend request already exists between you and this user".to_string()));
        }

        let request = FriendRequestEntity::new_pending(sender_id, recipient_id);
        // 并发下预检可能同时通过，由 pair_key 唯一约束兜底
        self.requests.insert_request(&request).await.map_err(|e| match e {
            AppError::Conflict(_) => {
                AppError::Conflict("A friend request already exists between you and this user".to_string())
            }
            other => other,
        })?;
        info!("friend request {} created: {} -> {}", request.id, sender_id, recipient_id);

        let view = FriendRequestView::from(&request);
        let event = RelayEvent::FriendRequest(FriendRequestNotice { request: view.clone(), sender: PublicProfile::from(&sender) });
        match self.relay.push(recipient_id, &event) {
            Ok(sent) => debug!("friend request {} pushed to {} connection(s)", request.id, sent),
            Err(RelayError::NotConnected(uid)) => debug!("recipient {} is offline, push skipped", uid),
            Err(e) => warn!("push friend request {} failed: {}", request.id, e),
        }
        Ok(view)
    }

    /// 接受好友请求：仅接收方可操作，且只能从 pending 转为 accepted
    pub async fn accept_request(&self, request_id: &str, actor_id: &str) -> AppResult<FriendRequestView> {
        let request = self
            .requests
            .find_request(request_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Friend request not found".to_string()))?;
        if request.recipient_id != actor_id {
            warn!("{} tried to accept friend request {} addressed to {}", actor_id, request_id, request.recipient_id);
            return Err(AppError::Forbidden("You are not authorized to accept this request".to_string()));
        }
        if !request.is_pending() {
            return Err(AppError::Conflict("Friend request is not pending".to_string()));
        }

        let accepted_at = now_millis();
        self.requests.accept_request(&request, accepted_at).await?;
        info!("friend request {} accepted: {} <-> {}", request.id, request.sender_id, request.recipient_id);

        let mut accepted = request;
        accepted.status = FriendRequestStatus::Accepted;
        accepted.updated_at = accepted_at;
        Ok(FriendRequestView::from(&accepted))
    }

    /// 收到的待处理请求，最早的在前
    pub async fn list_incoming(&self, uid: &str) -> AppResult<Vec<IncomingFriendRequest>> {
        let found = self.requests.find_requests(RequestQuery::IncomingPending(uid)).await?;
        let profiles = self.profiles_of(found.iter().map(|r| r.sender_id.clone())).await?;
        Ok(found
            .iter()
            .filter_map(|r| {
                let sender = lookup(&profiles, &r.sender_id, &r.id)?;
                Some(IncomingFriendRequest {
                    id: r.id.clone(),
                    status: r.status,
                    created_at: r.created_at,
                    updated_at: r.updated_at,
                    sender,
                })
            })
            .collect())
    }

    /// 发出的待处理请求，最新的在前
    pub async fn list_outgoing(&self, uid: &str) -> AppResult<Vec<OutgoingFriendRequest>> {
        let found = self.requests.find_requests(RequestQuery::OutgoingPending(uid)).await?;
        let profiles = self.profiles_of(found.iter().map(|r| r.recipient_id.clone())).await?;
        Ok(found
            .iter()
            .filter_map(|r| {
                let recipient = lookup(&profiles, &r.recipient_id, &r.id)?;
                Some(OutgoingFriendRequest {
                    id: r.id.clone(),
                    status: r.status,
                    created_at: r.created_at,
                    updated_at: r.updated_at,
                    recipient,
                })
            })
            .collect())
    }

    /// 涉及该用户的已通过请求，最近更新的在前
    pub async fn list_accepted(&self, uid: &str) -> AppResult<Vec<AcceptedFriendRequest>> {
        let found = self.requests.find_requests(RequestQuery::AcceptedInvolving(uid)).await?;
        let ids = found.iter().flat_map(|r| [r.sender_id.clone(), r.recipient_id.clone()]);
        let profiles = self.profiles_of(ids).await?;
        Ok(found
            .iter()
            .filter_map(|r| {
                let sender = lookup(&profiles, &r.sender_id, &r.id)?;
                let recipient = lookup(&profiles, &r.recipient_id, &r.id)?;
                Some(AcceptedFriendRequest {
                    id: r.id.clone(),
                    status: r.status,
                    created_at: r.created_at,
                    updated_at: r.updated_at,
                    sender,
                    recipient,
                })
            })
            .collect())
    }

    pub async fn friend_requests(&self, uid: &str) -> AppResult<FriendRequestsView> {
        Ok(FriendRequestsView { incoming_reqs: self.list_incoming(uid).await?, accepted_reqs: self.list_accepted(uid).await? })
    }

    async fn profiles_of(&self, ids: impl Iterator<Item = UserId>) -> AppResult<HashMap<UserId, PublicProfile>> {
        let mut ids: Vec<UserId> = ids.collect();
        ids.sort();
        ids.dedup();
        let found: Vec<AccountEntity> = self.accounts.find_accounts(&ids).await?;
        Ok(found.iter().map(|a| (a.id.clone(), PublicProfile::from(a))).collect())
    }
}

fn lookup(profiles: &HashMap<UserId, PublicProfile>, uid: &str, request_id: &str) -> Option<PublicProfile> {
    let profile = profiles.get(uid).cloned();
    if profile.is_none() {
        warn!("friend request {} references missing account {}", request_id, uid);
    }
    profile
}

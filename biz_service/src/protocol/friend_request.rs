use crate::entitys::friend_request_entity::{FriendRequestEntity, FriendRequestStatus};
use crate::protocol::account::PublicProfile;
use common::UserId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 好友请求记录本身（创建接口与推送事件返回）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestView {
    pub id: String,
    pub sender_id: UserId,
    pub recipient_id: UserId,
    pub status: FriendRequestStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<&FriendRequestEntity> for FriendRequestView {
    fn from(entity: &FriendRequestEntity) -> Self {
        Self {
            id: entity.id.clone(),
            sender_id: entity.sender_id.clone(),
            recipient_id: entity.recipient_id.clone(),
            status: entity.status,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// 收到的请求，附带发送方资料
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IncomingFriendRequest {
    pub id: String,
    pub status: FriendRequestStatus,
    pub created_at: i64,
    pub updated_at: i64,
    pub sender: PublicProfile,
}

/// 发出的请求，附带接收方资料
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingFriendRequest {
    pub id: String,
    pub status: FriendRequestStatus,
    pub created_at: i64,
    pub updated_at: i64,
    pub recipient: PublicProfile,
}

/// 已通过的请求，双方资料
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AcceptedFriendRequest {
    pub id: String,
    pub status: FriendRequestStatus,
    pub created_at: i64,
    pub updated_at: i64,
    pub sender: PublicProfile,
    pub recipient: PublicProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestsView {
    pub incoming_reqs: Vec<IncomingFriendRequest>,
    pub accepted_reqs: Vec<AcceptedFriendRequest>,
}

use common::UserId;
use common::index_trait::MongoIndexModelProvider;
use common::util::common_utils::{build_id, pair_key};
use common::util::date_util::now_millis;
use mongo_macro::MongoIndexModelProvider as MongoDeriveMongoIndex;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};
use utoipa::ToSchema;

/// 好友请求状态：只允许 pending → accepted
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, ToSchema, AsRefStr, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FriendRequestStatus {
    #[default]
    Pending,
    Accepted,
}

/// 好友请求记录，`pair_key` 上的唯一索引保证同一对用户最多一条
#[derive(Debug, Clone, Serialize, Deserialize, Default, MongoDeriveMongoIndex)]
#[mongo_index(fields("pair_key"), unique, name = "uniq_friend_pair")]
#[mongo_index(fields("recipient_id", "status"))]
#[mongo_index(fields("sender_id", "status"))]
pub struct FriendRequestEntity {
    #[serde(rename = "_id")]
    pub id: String,
    pub sender_id: UserId,
    pub recipient_id: UserId,
    pub pair_key: String,
    pub status: FriendRequestStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

impl FriendRequestEntity {
    pub fn new_pending(sender_id: &str, recipient_id: &str) -> Self {
        let now = now_millis();
        Self {
            id: build_id(),
            sender_id: sender_id.to_string(),
            recipient_id: recipient_id.to_string(),
            pair_key: pair_key(sender_id, recipient_id),
            status: FriendRequestStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == FriendRequestStatus::Pending
    }

    pub fn involves(&self, uid: &str) -> bool {
        self.sender_id == uid || self.recipient_id == uid
    }
}

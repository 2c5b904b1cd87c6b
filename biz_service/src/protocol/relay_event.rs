use crate::protocol::account::PublicProfile;
use crate::protocol::friend_request::FriendRequestView;
use common::UserId;
use serde::{Deserialize, Serialize};

/// 服务端 → 客户端推送事件
///
/// 线上格式：`{"event":"friendRequest","data":{...}}`。事件只是提示，
/// 客户端收到后应重新拉取列表，不以负载为准。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum RelayEvent {
    FriendRequest(FriendRequestNotice),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestNotice {
    pub request: FriendRequestView,
    pub sender: PublicProfile,
}

/// 客户端 → 服务端指令
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ClientCommand {
    /// 加入自己的地址（先退出此连接之前加入的地址）
    Join {
        #[serde(rename = "userId")]
        user_id: UserId,
    },
    Leave,
}

pub mod socket_relay;

use crate::protocol::relay_event::RelayEvent;
use common::UserId;
use thiserror::Error;

pub use socket_relay::{ConnectionId, SocketRelay};

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("no connection joined address {0}")]
    NotConnected(UserId),
    #[error("encode relay event failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// 按账号 ID 寻址的推送通道
///
/// 尽力而为：不排队、不重试、不持久化。返回值为成功投递的连接数。
pub trait NotificationRelay: Send + Sync {
    fn push(&self, account_id: &str, event: &RelayEvent) -> Result<usize, RelayError>;
}

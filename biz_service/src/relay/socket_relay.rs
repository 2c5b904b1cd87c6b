use crate::protocol::relay_event::{ClientCommand, RelayEvent};
use crate::relay::{NotificationRelay, RelayError};
use common::UserId;
use common::util::common_utils::build_id;
use dashmap::DashMap;
use log::{debug, info, warn};
use std::collections::HashSet;
use tokio::sync::mpsc;

/// 客户端连接唯一标识
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ConnectionId(pub String);

/// 连接实体：出站通道 + 当前加入的地址
#[derive(Clone, Debug)]
struct ConnectionInfo {
    sender: mpsc::UnboundedSender<String>,
    address: Option<UserId>,
}

/// 进程级推送中继：管理在线连接以及账号地址索引
///
/// 两张索引从不同时持有引用，避免跨分片锁顺序问题。
#[derive(Debug, Default)]
pub struct SocketRelay {
    /// 连接主索引：conn_id → 连接信息
    connections: DashMap<ConnectionId, ConnectionInfo>,

    /// 地址索引：user_id → {conn_id, ...}，一个账号可多端在线
    user_index: DashMap<UserId, HashSet<ConnectionId>>,
}

impl SocketRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新增连接，尚未加入任何地址
    pub fn register(&self, sender: mpsc::UnboundedSender<String>) -> ConnectionId {
        let id = ConnectionId(build_id());
        self.connections.insert(id.clone(), ConnectionInfo { sender, address: None });
        debug!("relay connection registered: {}", id.0);
        id
    }

    /// 加入地址：先退出该连接之前加入的地址
    pub fn join(&self, id: &ConnectionId, account_id: &str) -> bool {
        let previous = match self.connections.get_mut(id) {
            Some(mut conn) => conn.address.replace(account_id.to_string()),
            None => return false,
        };
        if let Some(previous) = previous {
            self.unindex(&previous, id);
        }
        self.user_index.entry(account_id.to_string()).or_default().insert(id.clone());
        info!("relay connection {} joined {}", id.0, account_id);
        true
    }

    /// 退出当前地址，连接保留
    pub fn leave(&self, id: &ConnectionId) {
        let previous = self.connections.get_mut(id).and_then(|mut conn| conn.address.take());
        if let Some(previous) = previous {
            self.unindex(&previous, id);
        }
    }

    /// 移除连接
    pub fn remove(&self, id: &ConnectionId) {
        if let Some((_, conn)) = self.connections.remove(id) {
            if let Some(address) = conn.address {
                self.unindex(&address, id);
            }
            info!("🔌 relay connection closed: {}", id.0);
        }
    }

    /// 处理客户端指令，只允许加入自己的地址
    pub fn apply_command(&self, id: &ConnectionId, owner: &str, command: ClientCommand) {
        match command {
            ClientCommand::Join { user_id } if user_id == owner => {
                self.join(id, &user_id);
            }
            ClientCommand::Join { user_id } => {
                warn!("relay connection {} of {} tried to join {}", id.0, owner, user_id);
            }
            ClientCommand::Leave => self.leave(id),
        }
    }

    /// 某地址下的在线连接数
    pub fn online_connections(&self, account_id: &str) -> usize {
        self.user_index.get(account_id).map(|set| set.len()).unwrap_or(0)
    }

    fn unindex(&self, account_id: &str, id: &ConnectionId) {
        if let Some(mut set) = self.user_index.get_mut(account_id) {
            set.remove(id);
        }
        self.user_index.remove_if(account_id, |_, set| set.is_empty());
    }

    fn send_to_address(&self, account_id: &str, payload: &str) -> usize {
        let targets: Vec<ConnectionId> = match self.user_index.get(account_id) {
            Some(set) => set.iter().cloned().collect(),
            None => return 0,
        };
        let mut sent = 0;
        for conn_id in targets {
            if let Some(conn) = self.connections.get(&conn_id) {
                if conn.sender.send(payload.to_string()).is_ok() {
                    sent += 1;
                }
            }
        }
        sent
    }
}

impl NotificationRelay for SocketRelay {
    fn push(&self, account_id: &str, event: &RelayEvent) -> Result<usize, RelayError> {
        let payload = serde_json::to_string(event)?;
        match self.send_to_address(account_id, &payload) {
            0 => Err(RelayError::NotConnected(account_id.to_string())),
            sent => Ok(sent),
        }
    }
}

pub mod stream_client;

use async_trait::async_trait;
use thiserror::Error;

pub use stream_client::StreamChatClient;

#[derive(Debug, Error)]
pub enum ChatPlatformError {
    #[error("chat platform credentials are not configured")]
    NotConfigured,
    #[error("sign server token failed: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("chat platform request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("chat platform rejected request: {status} {body}")]
    Rejected { status: u16, body: String },
}

/// 第三方聊天/视频平台的服务端接口
///
/// 平台侧用户须先存在，客户端 SDK 才能以用户令牌连接。
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// 创建或更新平台用户（幂等）
    async fn upsert_user(&self, id: &str, name: &str, image: &str) -> Result<(), ChatPlatformError>;
}

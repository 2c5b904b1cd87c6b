use common::errors::{AppError, AppResult};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct ChatUserClaims {
    user_id: String,
}

/// 第三方聊天/视频平台的用户令牌：以平台 API secret 签名的 HS256 JWT，
/// 载荷只有 `user_id`。聊天与通话本身由客户端 SDK 直连平台完成。
pub struct ChatTokenService {
    encoding_key: Option<EncodingKey>,
}

impl ChatTokenService {
    pub fn new(api_secret: &str) -> Self {
        let encoding_key = (!api_secret.is_empty()).then(|| EncodingKey::from_secret(api_secret.as_bytes()));
        Self { encoding_key }
    }

    pub fn create_user_token(&self, user_id: &str) -> AppResult<String> {
        let key = self
            .encoding_key
            .as_ref()
            .ok_or_else(|| AppError::Internal("chat platform credentials are not configured".to_string()))?;
        if user_id.is_empty() {
            return Err(AppError::Validation("user id is required to create a chat token".to_string()));
        }
        encode(&Header::new(Algorithm::HS256), &ChatUserClaims { user_id: user_id.to_string() }, key)
            .map_err(|e| AppError::Internal(format!("sign chat token: {}", e)))
    }
}

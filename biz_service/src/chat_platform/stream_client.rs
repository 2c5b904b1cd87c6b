use crate::chat_platform::{ChatPlatform, ChatPlatformError};
use async_trait::async_trait;
use common::config::StreamConfig;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use log::debug;
use serde::Serialize;
use serde_json::{Value, json};
use std::time::Duration;

const DEFAULT_IMAGE: &str = "/default-avatar.png";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize)]
struct ServerClaims {
    server: bool,
}

/// Stream Chat REST 客户端：`POST {base_url}/users?api_key=..`，
/// 以 API secret 签名的服务端 JWT 认证
pub struct StreamChatClient {
    api_key: String,
    encoding_key: Option<EncodingKey>,
    base_url: String,
    client: reqwest::Client,
}

impl StreamChatClient {
    pub fn new(config: &StreamConfig) -> Result<Self, ChatPlatformError> {
        let configured = !config.api_key.is_empty() && !config.api_secret.is_empty();
        let encoding_key = configured.then(|| EncodingKey::from_secret(config.api_secret.as_bytes()));
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            api_key: config.api_key.clone(),
            encoding_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn server_token(&self) -> Result<String, ChatPlatformError> {
        let key = self.encoding_key.as_ref().ok_or(ChatPlatformError::NotConfigured)?;
        Ok(encode(&Header::new(Algorithm::HS256), &ServerClaims { server: true }, key)?)
    }
}

/// 用户 upsert 请求体，以用户 ID 为键；头像为空时使用默认图
fn upsert_payload(id: &str, name: &str, image: &str) -> Value {
    let image = if image.is_empty() { DEFAULT_IMAGE } else { image };
    json!({ "users": { id: { "id": id, "name": name, "image": image } } })
}

#[async_trait]
impl ChatPlatform for StreamChatClient {
    async fn upsert_user(&self, id: &str, name: &str, image: &str) -> Result<(), ChatPlatformError> {
        let token = self.server_token()?;
        let response = self
            .client
            .post(format!("{}/users", self.base_url))
            .query(&[("api_key", self.api_key.as_str())])
            .header("Authorization", token)
            .header("stream-auth-type", "jwt")
            .json(&upsert_payload(id, name, image))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatPlatformError::Rejected { status: status.as_u16(), body });
        }
        debug!("chat platform user upserted: {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{DecodingKey, Validation, decode};
    use serde::Deserialize;

    fn stream_config(api_key: &str, api_secret: &str) -> StreamConfig {
        StreamConfig { api_key: api_key.into(), api_secret: api_secret.into(), ..Default::default() }
    }

    #[test]
    fn payload_is_keyed_by_user_id_with_default_image() {
        let body = upsert_payload("u1", "Ana", "");
        assert_eq!(body["users"]["u1"]["id"], "u1");
        assert_eq!(body["users"]["u1"]["name"], "Ana");
        assert_eq!(body["users"]["u1"]["image"], DEFAULT_IMAGE);

        let body = upsert_payload("u1", "Ana", "https://cdn.example.com/a.png");
        assert_eq!(body["users"]["u1"]["image"], "https://cdn.example.com/a.png");
    }

    #[test]
    fn server_token_is_signed_with_api_secret() {
        #[derive(Deserialize)]
        struct Claims {
            server: bool,
        }
        let client = StreamChatClient::new(&stream_config("key", "platform-secret")).unwrap();
        let token = client.server_token().unwrap();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        let data = decode::<Claims>(&token, &DecodingKey::from_secret(b"platform-secret"), &validation).unwrap();
        assert!(data.claims.server);
    }

    #[tokio::test]
    async fn missing_credentials_fail_without_network() {
        for (key, secret) in [("", "platform-secret"), ("key", "")] {
            let client = StreamChatClient::new(&stream_config(key, secret)).unwrap();
            let result = client.upsert_user("u1", "Ana", "").await;
            assert!(matches!(result, Err(ChatPlatformError::NotConfigured)));
        }
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let config = StreamConfig { base_url: "https://chat.example.com/".into(), ..stream_config("k", "s") };
        let client = StreamChatClient::new(&config).unwrap();
        assert_eq!(client.base_url, "https://chat.example.com");
    }
}

use common::UserId;
use common::errors::{AppError, AppResult};
use common::util::date_util::now;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// 会话令牌载荷
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    pub user_id: UserId,
    pub iat: i64,
    pub exp: i64,
}

/// 密码哈希（bcrypt）与会话令牌（HS256 JWT）
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl_days: i64,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(secret: &str, token_ttl_days: i64, bcrypt_cost: u32) -> AppResult<Self> {
        if secret.is_empty() {
            return Err(AppError::Internal("sys.jwt_secret must be configured".to_string()));
        }
        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_ttl_days,
            bcrypt_cost,
        })
    }

    /// 令牌有效期（秒），同时用作 cookie max-age
    pub fn token_ttl_secs(&self) -> i64 {
        self.token_ttl_days * SECONDS_PER_DAY
    }

    pub fn issue_token(&self, user_id: &str) -> AppResult<String> {
        let iat = now();
        let claims = SessionClaims { user_id: user_id.to_string(), iat, exp: iat + self.token_ttl_secs() };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("sign session token: {}", e)))
    }

    pub fn verify_token(&self, token: &str) -> AppResult<SessionClaims> {
        decode::<SessionClaims>(token, &self.decoding_key, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))
    }

    pub async fn hash_password(&self, password: &str) -> AppResult<String> {
        let password = password.to_string();
        let cost = self.bcrypt_cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AppError::Internal(format!("hash task: {}", e)))?
            .map_err(|e| AppError::Internal(format!("hash password: {}", e)))
    }

    pub async fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        let password = password.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| AppError::Internal(format!("verify task: {}", e)))?
            .map_err(|e| AppError::Internal(format!("verify password: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        AuthService::new("unit-test-secret", 7, 4).unwrap()
    }

    #[test]
    fn empty_secret_is_rejected() {
        assert!(AuthService::new("", 7, 4).is_err());
    }

    #[test]
    fn issued_token_verifies() {
        let auth = service();
        let token = auth.issue_token("user-1").unwrap();
        let claims = auth.verify_token(&token).unwrap();
        assert_eq!(claims.user_id, "user-1");
        assert_eq!(claims.exp - claims.iat, 7 * SECONDS_PER_DAY);
    }

    #[test]
    fn foreign_and_expired_tokens_are_unauthorized() {
        let auth = service();
        let other = AuthService::new("another-secret", 7, 4).unwrap();
        let foreign = other.issue_token("user-1").unwrap();
        assert!(matches!(auth.verify_token(&foreign), Err(AppError::Unauthorized(_))));
        assert!(matches!(auth.verify_token("not-a-jwt"), Err(AppError::Unauthorized(_))));

        let stale = SessionClaims { user_id: "user-1".into(), iat: now() - 10 * SECONDS_PER_DAY, exp: now() - SECONDS_PER_DAY };
        let expired = encode(&Header::new(Algorithm::HS256), &stale, &auth.encoding_key).unwrap();
        assert!(matches!(auth.verify_token(&expired), Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn password_hash_round_trip() {
        let auth = service();
        let hash = auth.hash_password("hunter22").await.unwrap();
        assert_ne!(hash, "hunter22");
        assert!(auth.verify_password("hunter22", &hash).await.unwrap());
        assert!(!auth.verify_password("hunter23", &hash).await.unwrap());
    }
}

use crate::entitys::account_entity::AccountEntity;
use common::UserId;
use common::util::validate::validate_not_blank;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// 对其他用户可见的资料字段
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub id: UserId,
    pub full_name: String,
    pub profile_pic: String,
    pub native_language: String,
    pub learning_language: String,
    pub bio: String,
    pub location: String,
}

impl From<&AccountEntity> for PublicProfile {
    fn from(account: &AccountEntity) -> Self {
        Self {
            id: account.id.clone(),
            full_name: account.full_name.clone(),
            profile_pic: account.profile_pic.clone(),
            native_language: account.native_language.clone(),
            learning_language: account.learning_language.clone(),
            bio: account.bio.clone(),
            location: account.location.clone(),
        }
    }
}

/// 按 ID 查询用户时返回：公开资料 + 引导状态 + 好友 ID
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountProfile {
    #[serde(flatten)]
    pub profile: PublicProfile,
    pub is_onboarded: bool,
    pub friends: Vec<UserId>,
}

impl From<&AccountEntity> for AccountProfile {
    fn from(account: &AccountEntity) -> Self {
        Self { profile: account.into(), is_onboarded: account.is_onboarded, friends: account.friends.clone() }
    }
}

/// 当前登录用户自己的账号视图（含邮箱）
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    #[serde(flatten)]
    pub profile: AccountProfile,
    pub email: String,
}

impl From<&AccountEntity> for AccountView {
    fn from(account: &AccountEntity) -> Self {
        Self { profile: account.into(), email: account.email.clone() }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub full_name: String,
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "is required"))]
    pub password: String,
}

/// 资料引导：全部字段必填
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct OnboardRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub full_name: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub bio: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub native_language: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub learning_language: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub location: String,
}

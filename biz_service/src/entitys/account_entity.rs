use common::UserId;
use common::index_trait::MongoIndexModelProvider;
use mongo_macro::MongoIndexModelProvider as MongoDeriveMongoIndex;
use serde::{Deserialize, Serialize};

/// 账号信息：登录凭证、语言交换资料以及好友集合
#[derive(Debug, Clone, Serialize, Deserialize, Default, MongoDeriveMongoIndex)]
#[mongo_index(fields("email"), unique, name = "uniq_account_email")]
#[mongo_index(fields("is_onboarded"))]
pub struct AccountEntity {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub full_name: String,
    /// 登录邮箱（唯一）
    pub email: String,
    /// bcrypt 哈希，永不出现在任何对外结构中
    pub password: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub profile_pic: String,
    #[serde(default)]
    pub native_language: String,
    #[serde(default)]
    pub learning_language: String,
    #[serde(default)]
    pub location: String,
    /// 是否已完成资料引导
    #[serde(default)]
    pub is_onboarded: bool,
    /// 好友 ID 集合（有序、去重）
    #[serde(default)]
    pub friends: Vec<UserId>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl AccountEntity {
    pub fn is_friend_of(&self, other: &str) -> bool {
        self.friends.iter().any(|id| id == other)
    }

    /// 集合语义添加好友，重复添加无副作用
    pub fn add_friend(&mut self, other: &str) -> bool {
        if self.is_friend_of(other) {
            return false;
        }
        self.friends.push(other.to_string());
        true
    }
}

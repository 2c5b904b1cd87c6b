use crate::chat_platform::{ChatPlatform, ChatPlatformError};
use crate::entitys::account_entity::AccountEntity;
use crate::entitys::friend_request_entity::FriendRequestStatus;
use crate::protocol::account::PublicProfile;
use crate::protocol::friend_request::FriendRequestView;
use crate::protocol::relay_event::{FriendRequestNotice, RelayEvent};
use crate::relay::{NotificationRelay, RelayError};
use crate::store::{AccountStore, MemoryStore};
use async_trait::async_trait;
use common::util::common_utils::build_id;
use common::util::date_util::now_millis;
use std::sync::Mutex;

pub async fn seed_account(store: &MemoryStore, name: &str, onboarded: bool) -> AccountEntity {
    let now = now_millis();
    let account = AccountEntity {
        id: build_id(),
        full_name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        password: "not-a-real-hash".to_string(),
        native_language: "english".to_string(),
        learning_language: "spanish".to_string(),
        is_onboarded: onboarded,
        created_at: now,
        updated_at: now,
        ..Default::default()
    };
    store.insert_account(&account).await.unwrap();
    account
}

pub fn sample_event() -> RelayEvent {
    RelayEvent::FriendRequest(FriendRequestNotice {
        request: FriendRequestView {
            id: "req-1".into(),
            sender_id: "alice".into(),
            recipient_id: "bob".into(),
            status: FriendRequestStatus::Pending,
            created_at: 1,
            updated_at: 1,
        },
        sender: PublicProfile {
            id: "alice".into(),
            full_name: "Alice".into(),
            profile_pic: String::new(),
            native_language: "english".into(),
            learning_language: "spanish".into(),
            bio: String::new(),
            location: String::new(),
        },
    })
}

/// 记录所有推送，总是报告投递成功
#[derive(Default)]
pub struct RecordingRelay {
    pushed: Mutex<Vec<(String, RelayEvent)>>,
}

impl RecordingRelay {
    pub fn events(&self) -> Vec<(String, RelayEvent)> {
        self.pushed.lock().unwrap().clone()
    }
}

impl NotificationRelay for RecordingRelay {
    fn push(&self, account_id: &str, event: &RelayEvent) -> Result<usize, RelayError> {
        self.pushed.lock().unwrap().push((account_id.to_string(), event.clone()));
        Ok(1)
    }
}

pub struct FailingRelay;

impl NotificationRelay for FailingRelay {
    fn push(&self, account_id: &str, _event: &RelayEvent) -> Result<usize, RelayError> {
        Err(RelayError::NotConnected(account_id.to_string()))
    }
}

/// 记录所有 upsert 调用 (id, name, image)
#[derive(Default)]
pub struct RecordingChatPlatform {
    upserts: Mutex<Vec<(String, String, String)>>,
}

impl RecordingChatPlatform {
    pub fn upserts(&self) -> Vec<(String, String, String)> {
        self.upserts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatPlatform for RecordingChatPlatform {
    async fn upsert_user(&self, id: &str, name: &str, image: &str) -> Result<(), ChatPlatformError> {
        self.upserts.lock().unwrap().push((id.to_string(), name.to_string(), image.to_string()));
        Ok(())
    }
}

pub struct FailingChatPlatform;

#[async_trait]
impl ChatPlatform for FailingChatPlatform {
    async fn upsert_user(&self, _id: &str, _name: &str, _image: &str) -> Result<(), ChatPlatformError> {
        Err(ChatPlatformError::Rejected { status: 503, body: "unavailable".to_string() })
    }
}

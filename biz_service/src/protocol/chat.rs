use common::util::validate::validate_not_blank;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// 显式同步聊天平台用户
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct ChatUserRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub user_id: String,
}

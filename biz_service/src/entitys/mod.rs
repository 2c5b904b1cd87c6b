pub mod account_entity;
pub mod friend_request_entity;

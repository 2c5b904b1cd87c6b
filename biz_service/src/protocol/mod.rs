pub mod account;
pub mod chat;
pub mod friend_request;
pub mod relay_event;

pub mod account_service;
pub mod auth_service;
pub mod chat_token_service;
pub mod friend_request_service;

pub mod biz_service;
pub mod chat_platform;
pub mod entitys;
pub mod protocol;
pub mod relay;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;

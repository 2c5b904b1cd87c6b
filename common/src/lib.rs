pub mod config;
pub mod db;
pub mod errors;
pub mod repository;
pub mod util;

pub use repository::*;

pub type UserId = String;

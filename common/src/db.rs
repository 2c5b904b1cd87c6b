use crate::config::DatabaseConfig;
use anyhow::{Result, anyhow};
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};

/// 初始化 MongoDB 数据库连接
pub async fn init_db(config: &DatabaseConfig) -> Result<Database> {
    let client_options = ClientOptions::parse(&config.url)
        .await
        .map_err(|e| anyhow!("MongoDB URI parse error: {}", e))?;

    let client = Client::with_options(client_options).map_err(|e| anyhow!("MongoDB client init error: {}", e))?;

    Ok(client.database(&config.db_name))
}

use ::config::{Config, Environment, File, FileFormat};
use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::sync::Arc;

static INSTANCE: OnceCell<Arc<AppConfig>> = OnceCell::new();

/// 应用配置：TOML 文件 + `APP_` 前缀环境变量（如 `APP_SYS__JWT_SECRET`）
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    pub database: Option<DatabaseConfig>,
    pub server: Option<ServerConfig>,
    pub sys: Option<SysConfig>,
    pub stream: Option<StreamConfig>,
}

impl AppConfig {
    pub fn new(file: &str) -> anyhow::Result<Self> {
        let config = Config::builder()
            .add_source(File::with_name(file).required(true))
            .add_source(Environment::with_prefix("APP").prefix_separator("_").separator("__"))
            .build()?;
        Ok(config.try_deserialize::<AppConfig>()?)
    }

    /// 从 TOML 字符串构建（不读取环境变量）
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = Config::builder().add_source(File::from_str(content, FileFormat::Toml)).build()?;
        Ok(config.try_deserialize::<AppConfig>()?)
    }

    /// 加载配置并设置进程级单例
    pub fn init(file: &str) -> anyhow::Result<()> {
        let instance = Arc::new(Self::new(file)?);
        INSTANCE.set(instance).map_err(|_| anyhow::anyhow!("AppConfig already initialized"))?;
        Ok(())
    }

    /// 获取单例，未初始化时为 None
    pub fn get() -> Option<Arc<Self>> {
        INSTANCE.get().cloned()
    }

    pub fn get_database(&self) -> DatabaseConfig {
        self.database.clone().unwrap_or_default()
    }
    pub fn get_server(&self) -> ServerConfig {
        self.server.clone().unwrap_or_default()
    }
    pub fn get_sys(&self) -> SysConfig {
        self.sys.clone().unwrap_or_default()
    }
    pub fn get_stream(&self) -> StreamConfig {
        self.stream.clone().unwrap_or_default()
    }
}

/// 存储引擎：mongo 为生产环境，memory 仅用于本地开发
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageEngine {
    #[default]
    Mongo,
    Memory,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct DatabaseConfig {
    pub engine: StorageEngine,
    pub url: String,
    pub db_name: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 5003 }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SysConfig {
    //全局日志级别
    pub log_level: String,
    //会话令牌签名密钥
    pub jwt_secret: String,
    //会话有效天数
    pub token_expire_days: i64,
    //bcrypt 计算成本
    pub bcrypt_cost: u32,
    //cookie 是否仅 https
    pub cookie_secure: bool,
}

impl Default for SysConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            jwt_secret: String::new(),
            token_expire_days: 7,
            bcrypt_cost: 10,
            cookie_secure: false,
        }
    }
}

/// 第三方聊天/视频平台凭证
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StreamConfig {
    pub api_key: String,
    pub api_secret: String,
    //平台 REST 地址
    pub base_url: String,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self { api_key: String::new(), api_secret: String::new(), base_url: "https://chat.stream-io-api.com".to_string() }
    }
}

use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub draw: DrawConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// 获取连接（含等待行锁的事务）超时
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
}

/// 抽奖相关配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawConfig {
    /// 导入人员时头像路径前缀，文件名为小写人员编号
    #[serde(default = "default_avatar_prefix")]
    pub avatar_prefix: String,
    #[serde(default = "default_avatar_extension")]
    pub avatar_extension: String,
    /// CSV 未提供部门时使用
    #[serde(default = "default_department")]
    pub default_department: String,
    /// 事件广播缓冲大小，慢速订阅者超出后会丢失旧事件
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
    /// SSE 空闲时发送心跳注释的间隔，避免反向代理断开连接
    #[serde(default = "default_event_keepalive_secs")]
    pub event_keepalive_secs: u64,
}

fn default_connect_timeout() -> u64 {
    8
}

fn default_acquire_timeout() -> u64 {
    10
}

fn default_avatar_prefix() -> String {
    "avatars/".to_string()
}

fn default_avatar_extension() -> String {
    "jpg".to_string()
}

fn default_department() -> String {
    "Unknown".to_string()
}

fn default_event_channel_capacity() -> usize {
    256
}

fn default_event_keepalive_secs() -> u64 {
    15
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            avatar_prefix: default_avatar_prefix(),
            avatar_extension: default_avatar_extension(),
            default_department: default_department(),
            event_channel_capacity: default_event_channel_capacity(),
            event_keepalive_secs: default_event_keepalive_secs(),
        }
    }
}

impl DrawConfig {
    /// 根据人员编号生成默认头像路径，例如 `avatars/e001.jpg`
    pub fn avatar_for(&self, code: &str) -> String {
        format!(
            "{}{}.{}",
            self.avatar_prefix,
            code.to_lowercase(),
            self.avatar_extension
        )
    }
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 尝试读取配置文件，如果不存在则完全依赖环境变量
        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => Self::parse(&config_str)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                // 数据库 URL 在无配置文件时必须提供
                let database_url = get_env("DATABASE_URL")
                    .ok_or("DATABASE_URL is not set and no config.toml was found")?;

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 3001u16),
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                        connect_timeout_secs: default_connect_timeout(),
                        acquire_timeout_secs: default_acquire_timeout(),
                    },
                    draw: DrawConfig::default(),
                }
            }
            Err(e) => {
                return Err(format!("Failed to read config file {config_path}: {e}").into());
            }
        };

        // 环境变量覆盖（即便文件存在时也覆盖）
        config.apply_env_overrides();

        Ok(config)
    }

    /// 解析 TOML 配置内容
    pub fn parse(content: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Config =
            toml::from_str(content).map_err(|e| format!("Failed to parse config file: {e}"))?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            self.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            self.database.max_connections = mc;
        }
        if let Ok(v) = env::var("DB_CONNECT_TIMEOUT")
            && let Ok(n) = v.parse()
        {
            self.database.connect_timeout_secs = n;
        }
        if let Ok(v) = env::var("DB_ACQUIRE_TIMEOUT")
            && let Ok(n) = v.parse()
        {
            self.database.acquire_timeout_secs = n;
        }
        if let Ok(v) = env::var("DRAW_AVATAR_PREFIX") {
            self.draw.avatar_prefix = v;
        }
        if let Ok(v) = env::var("DRAW_AVATAR_EXTENSION") {
            self.draw.avatar_extension = v;
        }
        if let Ok(v) = env::var("DRAW_DEFAULT_DEPARTMENT") {
            self.draw.default_department = v;
        }
        if let Ok(v) = env::var("EVENT_CHANNEL_CAPACITY")
            && let Ok(n) = v.parse()
        {
            self.draw.event_channel_capacity = n;
        }
        if let Ok(v) = env::var("EVENT_KEEPALIVE_SECS")
            && let Ok(n) = v.parse()
        {
            self.draw.event_keepalive_secs = n;
        }
    }
}

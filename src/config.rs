use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub economy: EconomyConfig,
    #[serde(default)]
    pub cooldowns: CooldownConfig,
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
}

/// 机器人层配置: 管理员名单 (聊天平台用户 id)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BotConfig {
    #[serde(default)]
    pub admins: Vec<i64>,
}

/// 经济参数, 金额一律为 cents (展示值 x100)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconomyConfig {
    /// 每条消息的基础收入
    pub coins_per_msg: i64,
    /// 21 点最小下注
    pub min_bet: i64,
    /// 付费动作价格
    pub anime_price: i64,
    pub img_price: i64,
    /// COINS 类型抽奖单个奖励的金额上下限
    pub min_giveaway_coins: i64,
    pub max_giveaway_coins: i64,
    /// 每条消息随机 XP 的闭区间
    pub xp_min: i64,
    pub xp_max: i64,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            coins_per_msg: 10,
            min_bet: 100,
            anime_price: 300,
            img_price: 300,
            min_giveaway_coins: 100,
            max_giveaway_coins: 100_000,
            xp_min: 15,
            xp_max: 25,
        }
    }
}

/// 各动作冷却时长 (秒), 启动时整表重建到 action_cooldowns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CooldownConfig {
    pub message: i64,
    pub who: i64,
    pub eight_ball: i64,
    pub pick: i64,
    pub rating: i64,
    pub anime: i64,
    pub image: i64,
    pub blackjack: i64,
}

impl Default for CooldownConfig {
    fn default() -> Self {
        Self {
            message: 30,
            who: 30,
            eight_ball: 30,
            pick: 30,
            rating: 30,
            anime: 130,
            image: 130,
            blackjack: 130,
        }
    }
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 尝试读取配置文件, 如果不存在则完全依赖环境变量
        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => {
                // 有配置文件: 先解析再用环境变量覆盖
                toml::from_str(&config_str)
                    .map_err(|e| format!("Failed to parse config file: {e}"))?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                // 无配置文件: 使用环境变量与默认值构建
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
                    .ok_or("DATABASE_URL is not set and config.toml was not found")?;

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                    },
                    bot: BotConfig::default(),
                    economy: EconomyConfig::default(),
                    cooldowns: CooldownConfig::default(),
                }
            }
            Err(e) => {
                return Err(format!("Failed to read config file {config_path}: {e}").into());
            }
        };

        // 环境变量覆盖 (即便文件存在时也覆盖)
        if let Ok(v) = env::var("SERVER_HOST") {
            config.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            config.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            config.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            config.database.max_connections = mc;
        }
        if let Ok(v) = env::var("BOT_ADMINS") {
            // 逗号分隔的用户 id 列表
            config.bot.admins = v
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
        }

        if config.economy.xp_min > config.economy.xp_max {
            return Err("economy.xp_min must not exceed economy.xp_max".into());
        }

        Ok(config)
    }
}

use config::{Config, ConfigError, Environment, File};
use std::sync::OnceLock;

use super::AppConfig;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

// config.toml 中的开发用密钥
const DEV_JWT_SECRET: &str = "change-me-in-production";

impl AppConfig {
    /// 加载配置
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            // 首先加载默认配置文件
            .add_source(File::with_name("config").required(false))
            // 然后根据环境加载特定配置文件
            .add_source(
                File::with_name(&format!(
                    "config.{}",
                    std::env::var("APP_ENV").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // 最后加载环境变量覆盖
            .add_source(
                Environment::with_prefix("COURSEHUB")
                    .separator("_")
                    .try_parsing(true),
            );

        // 支持从环境变量加载
        builder = builder
            .set_override_option("app.environment", std::env::var("APP_ENV").ok())?
            .set_override_option("app.log_level", std::env::var("RUST_LOG").ok())?
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("server.unix_socket_path", std::env::var("UNIX_SOCKET").ok())?
            .set_override_option("server.workers", std::env::var("CPU_COUNT").ok())?
            .set_override_option("jwt.secret", std::env::var("JWT_SECRET").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("cache.redis.url", std::env::var("REDIS_URL").ok())?
            .set_override_option(
                "cache.redis.key_prefix",
                std::env::var("REDIS_KEY_PREFIX").ok(),
            )?
            .set_override_option("cache.default_ttl", std::env::var("REDIS_TTL").ok())?
            .set_override_option(
                "payment.momo.access_key",
                std::env::var("MOMO_ACCESS_KEY").ok(),
            )?
            .set_override_option(
                "payment.momo.secret_key",
                std::env::var("MOMO_SECRET_KEY").ok(),
            )?
            .set_override_option("payment.momo.ipn_url", std::env::var("MOMO_IPN_URL").ok())?
            .set_override_option(
                "payment.momo.redirect_url",
                std::env::var("MOMO_REDIRECT_URL").ok(),
            )?;

        let config = builder.build()?;
        let mut app_config: AppConfig = config.try_deserialize()?;
        app_config.normalize()?;
        Ok(app_config)
    }

    /// 修正越界取值，拒绝生产环境下的不安全配置
    fn normalize(&mut self) -> Result<(), ConfigError> {
        if self.server.workers == 0 {
            self.server.workers = num_cpus::get().min(self.server.max_workers.max(1));
        }

        // broadcast 通道容量不能为 0
        self.forum.channel_capacity = self.forum.channel_capacity.max(1);
        // 至少保留根评论和一层回复
        self.forum.max_reply_depth = self.forum.max_reply_depth.max(2);
        self.password_reset.otp_length = self.password_reset.otp_length.clamp(4, 10);

        if self.is_production() {
            if self.jwt.secret.len() < 32 || self.jwt.secret == DEV_JWT_SECRET {
                return Err(ConfigError::Message(
                    "jwt.secret must be set to at least 32 characters in production".into(),
                ));
            }
            if self.payment.momo.access_key.is_empty() || self.payment.momo.secret_key.is_empty() {
                return Err(ConfigError::Message(
                    "MoMo access_key and secret_key are required in production".into(),
                ));
            }
        }
        Ok(())
    }

    /// 获取全局配置实例
    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            })
        })
    }

    /// 初始化配置 (在应用启动时调用)
    pub fn init() -> Result<(), ConfigError> {
        let config = Self::load()?;
        APP_CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("Configuration already initialized".to_string()))?;
        Ok(())
    }

    /// 检查是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }

    /// 检查是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    /// 获取服务器绑定地址
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 获取 Unix 套接字路径 (如果配置了)
    #[cfg(unix)]
    pub fn unix_socket_path(&self) -> Option<&str> {
        if self.server.unix_socket_path.is_empty() {
            None
        } else {
            Some(&self.server.unix_socket_path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_clamps_forum_and_otp_settings() {
        let mut config = AppConfig::load().unwrap();
        config.app.environment = "development".into();
        config.forum.channel_capacity = 0;
        config.forum.max_reply_depth = 0;
        config.password_reset.otp_length = 64;

        config.normalize().unwrap();
        assert_eq!(config.forum.channel_capacity, 1);
        assert_eq!(config.forum.max_reply_depth, 2);
        assert_eq!(config.password_reset.otp_length, 10);
    }

    #[test]
    fn test_production_rejects_dev_secret() {
        let mut config = AppConfig::load().unwrap();
        config.app.environment = "production".into();
        config.jwt.secret = DEV_JWT_SECRET.into();
        assert!(config.normalize().is_err());

        config.jwt.secret = "x".repeat(48);
        config.payment.momo.access_key = "access".into();
        config.payment.momo.secret_key = "secret".into();
        assert!(config.normalize().is_ok());
    }
}

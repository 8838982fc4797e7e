//! 统一配置中心
//!
//! 提供应用的全局配置管理，包括：
//! - 服务监听地址
//! - JWT认证
//! - 头像策略与本地头像目录
//!
//! 加载优先级：默认值 -> 可选配置文件（`APP_CONFIG_FILE`）-> 环境变量（`APP_*`，`__` 分隔嵌套字段）。

use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, path::PathBuf};

/// 全局应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 服务配置
    #[serde(default)]
    pub server: ServerConfig,
    /// JWT认证配置
    #[serde(default)]
    pub jwt: JwtConfig,
    /// 头像配置
    #[serde(default)]
    pub avatar: AvatarConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// JWT配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "dev-secret-key-not-for-production-use-minimum-32-chars".to_string(),
            expiration_hours: 24,
        }
    }
}

/// 头像策略种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvatarProviderKind {
    /// 本地上传的头像文件
    FileSystem,
    /// 认证提供方给出的头像
    Auth,
    /// Gravatar
    Gravatar,
}

/// 头像配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvatarConfig {
    /// 本地头像目录
    pub directory: PathBuf,
    /// 头像目录对外暴露的 URL 前缀
    pub public_path: String,
    /// Gravatar 主机名
    pub gravatar_host: String,
    /// 按优先级排列的头像策略
    pub providers: Vec<AvatarProviderKind>,
    /// 上传头像的最大字节数
    pub max_upload_bytes: usize,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("avatars"),
            public_path: "/avatars".to_string(),
            gravatar_host: "www.gravatar.com".to_string(),
            providers: vec![
                AvatarProviderKind::FileSystem,
                AvatarProviderKind::Auth,
                AvatarProviderKind::Gravatar,
            ],
            max_upload_bytes: 5 * 1024 * 1024,
        }
    }
}

impl AppConfig {
    /// 从默认值、可选配置文件和环境变量加载配置
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        if let Ok(path) = std::env::var("APP_CONFIG_FILE") {
            figment = Self::merge_file(figment, &path);
        }

        Self::extract(figment.merge(Env::prefixed("APP_").split("__")))
    }

    /// 只从指定配置文件加载（缺省字段使用默认值）
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));
        Self::extract(Self::merge_file(figment, path))
    }

    fn merge_file(figment: Figment, path: &str) -> Figment {
        if path.ends_with(".yml") || path.ends_with(".yaml") {
            figment.merge(Yaml::file(path))
        } else if path.ends_with(".json") {
            figment.merge(Json::file(path))
        } else {
            figment.merge(Toml::file(path))
        }
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: AppConfig = figment
            .extract()
            .map_err(|err| ConfigError::Load(Box::new(err)))?;
        config.validate()?;
        Ok(config)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::InvalidServerConfig(
                "Server host cannot be empty".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::InvalidServerPort(
                "Server port must be greater than 0".to_string(),
            ));
        }

        // JWT密钥至少256位/32字节
        if self.jwt.secret.len() < 32 {
            return Err(ConfigError::InvalidJwtSecret(
                "JWT secret must be at least 32 characters long".to_string(),
            ));
        }

        if self.jwt.expiration_hours <= 0 {
            return Err(ConfigError::InvalidJwtExpiration(
                "JWT expiration must be positive".to_string(),
            ));
        }

        self.avatar.validate()
    }
}

impl AvatarConfig {
    /// 验证头像配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.directory.as_os_str().is_empty() {
            return Err(ConfigError::InvalidAvatarConfig(
                "Avatar directory cannot be empty".to_string(),
            ));
        }

        if !self.public_path.starts_with('/') || self.public_path.ends_with('/') {
            return Err(ConfigError::InvalidAvatarConfig(format!(
                "Avatar public path must start with '/' and not end with '/': {}",
                self.public_path
            )));
        }

        if self.gravatar_host.trim().is_empty() {
            return Err(ConfigError::InvalidAvatarConfig(
                "Gravatar host cannot be empty".to_string(),
            ));
        }

        if self.providers.is_empty() {
            return Err(ConfigError::InvalidAvatarConfig(
                "At least one avatar provider is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for kind in &self.providers {
            if !seen.insert(kind) {
                return Err(ConfigError::InvalidAvatarConfig(format!(
                    "Avatar provider listed twice: {:?}",
                    kind
                )));
            }
        }

        if self.max_upload_bytes == 0 {
            return Err(ConfigError::InvalidAvatarConfig(
                "Avatar upload limit must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[source] Box<figment::Error>),
    #[error("Invalid JWT secret: {0}")]
    InvalidJwtSecret(String),
    #[error("Invalid JWT expiration: {0}")]
    InvalidJwtExpiration(String),
    #[error("Invalid server port: {0}")]
    InvalidServerPort(String),
    #[error("Invalid server configuration: {0}")]
    InvalidServerConfig(String),
    #[error("Invalid avatar configuration: {0}")]
    InvalidAvatarConfig(String),
}

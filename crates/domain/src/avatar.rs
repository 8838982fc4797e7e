//! 头像解析策略
//!
//! 每个策略根据 [`ChatUser`] 给出头像 URL，或返回 [`AvatarError::NoAvatarUrl`]。
//! [`TryAvatars`] 按固定优先级依次尝试多个策略，第一个成功者胜出。

use crate::chat_user::ChatUser;
use crate::errors::{AvatarError, AvatarResult};

/// Gravatar 默认主机
pub const DEFAULT_GRAVATAR_HOST: &str = "www.gravatar.com";

/// 头像策略
///
/// 成功时返回的 URL 一定非空，可直接放进 `<img src>`。
/// `NoAvatarUrl` 只表示“该策略无法给出头像”，不用于报告基础设施故障。
pub trait AvatarProvider: Send + Sync {
    /// 返回指定用户的头像 URL
    fn avatar_url(&self, user: &dyn ChatUser) -> AvatarResult;

    /// 策略名称，用于日志
    fn name(&self) -> &'static str;
}

/// 使用认证提供方给出的头像
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthAvatar;

impl AvatarProvider for AuthAvatar {
    fn avatar_url(&self, user: &dyn ChatUser) -> AvatarResult {
        let url = user.avatar_url();
        if url.is_empty() {
            return Err(AvatarError::NoAvatarUrl);
        }
        Ok(url)
    }

    fn name(&self) -> &'static str {
        "auth"
    }
}

/// 由唯一标识拼出 Gravatar 地址，永远成功
#[derive(Debug, Clone)]
pub struct GravatarAvatar {
    host: String,
}

impl GravatarAvatar {
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }
}

impl Default for GravatarAvatar {
    fn default() -> Self {
        Self::new(DEFAULT_GRAVATAR_HOST)
    }
}

impl AvatarProvider for GravatarAvatar {
    fn avatar_url(&self, user: &dyn ChatUser) -> AvatarResult {
        Ok(format!("//{}/avatar/{}", self.host, user.unique_id()))
    }

    fn name(&self) -> &'static str {
        "gravatar"
    }
}

/// 有序回退链
///
/// 构造后顺序固定。依次调用各策略，返回第一个成功结果，后面的策略不会被调用；
/// 全部失败时返回统一的 `NoAvatarUrl`。不重试，不缓存。
#[derive(Default)]
pub struct TryAvatars {
    providers: Vec<Box<dyn AvatarProvider>>,
}

impl TryAvatars {
    pub fn new(providers: Vec<Box<dyn AvatarProvider>>) -> Self {
        Self { providers }
    }

    /// 在链尾追加一个策略
    pub fn with(mut self, provider: impl AvatarProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// 按优先级排列的策略名称
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }
}

impl AvatarProvider for TryAvatars {
    fn avatar_url(&self, user: &dyn ChatUser) -> AvatarResult {
        for provider in &self.providers {
            if let Ok(url) = provider.avatar_url(user) {
                return Ok(url);
            }
        }
        Err(AvatarError::NoAvatarUrl)
    }

    fn name(&self) -> &'static str {
        "try_avatars"
    }
}

impl std::fmt::Debug for TryAvatars {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TryAvatars")
            .field("providers", &self.provider_names())
            .finish()
    }
}

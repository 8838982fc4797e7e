//! 聊天用户
//!
//! 认证层提供的当前用户视图。头像模块只读取它，从不修改或持久化。

use crate::errors::{DomainError, DomainResult};
use data_encoding::HEXLOWER;
use ring::digest::{digest, SHA256};
use serde::{Deserialize, Serialize};

/// 聊天参与者能力
///
/// `unique_id` 既是哈希头像服务的键，也是本地头像文件名的前缀。
/// `avatar_url` 为空字符串表示认证提供方没有给出头像。
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait ChatUser: Send + Sync {
    /// 稳定且唯一的用户标识
    fn unique_id(&self) -> String;

    /// 认证提供方给出的头像 URL，没有时为空字符串
    fn avatar_url(&self) -> String;
}

/// 一次请求内的聊天用户资料
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatUserProfile {
    unique_id: String,
    #[serde(default)]
    avatar_url: String,
}

impl ChatUserProfile {
    /// 用已知的唯一标识创建用户资料
    ///
    /// 唯一标识会被用作文件名前缀，因此不能为空，也不能包含路径分隔符。
    pub fn new(unique_id: impl Into<String>, avatar_url: impl Into<String>) -> DomainResult<Self> {
        let unique_id = unique_id.into();
        Self::validate_unique_id(&unique_id)?;

        Ok(Self {
            unique_id,
            avatar_url: avatar_url.into(),
        })
    }

    /// 由邮箱地址派生唯一标识
    ///
    /// 标识为去除首尾空白并转小写后邮箱的 SHA-256 十六进制摘要，与 Gravatar 的哈希规则一致。
    ///
    /// # 示例
    /// ```
    /// use domain::{ChatUser, ChatUserProfile};
    ///
    /// let user = ChatUserProfile::from_email(" Alice@Example.com ", "").unwrap();
    /// assert_eq!(user.unique_id().len(), 64);
    /// ```
    pub fn from_email(email: &str, avatar_url: impl Into<String>) -> DomainResult<Self> {
        let normalized = email.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(DomainError::validation_error("email", "邮箱不能为空"));
        }

        let hash = digest(&SHA256, normalized.as_bytes());
        Self::new(HEXLOWER.encode(hash.as_ref()), avatar_url)
    }

    fn validate_unique_id(unique_id: &str) -> DomainResult<()> {
        if unique_id.is_empty() {
            return Err(DomainError::validation_error("unique_id", "唯一标识不能为空"));
        }

        if unique_id == "."
            || unique_id == ".."
            || unique_id.contains(['/', '\\', '\0'])
        {
            return Err(DomainError::validation_error(
                "unique_id",
                "唯一标识不能包含路径分隔符",
            ));
        }

        Ok(())
    }
}

impl ChatUser for ChatUserProfile {
    fn unique_id(&self) -> String {
        self.unique_id.clone()
    }

    fn avatar_url(&self) -> String {
        self.avatar_url.clone()
    }
}

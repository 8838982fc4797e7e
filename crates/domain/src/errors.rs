//! 领域模型错误定义
//!
//! 头像解析只有一种失败：没有任何策略能给出 URL。其余校验错误归入 `DomainError`。

use thiserror::Error;

/// 头像解析错误
///
/// 既用于单个头像策略的失败，也用于整个回退链全部失败后的统一结果。
/// 不携带具体是哪个策略失败、为何失败的信息。
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvatarError {
    /// 无法获取头像 URL
    #[error("chat: unable to get an avatar URL")]
    NoAvatarUrl,
}

/// 领域模型错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// 验证错误
    #[error("验证失败: {field}: {message}")]
    ValidationError { field: String, message: String },
}

impl DomainError {
    /// 创建验证错误
    pub fn validation_error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// 领域模型结果类型
pub type DomainResult<T> = Result<T, DomainError>;

/// 头像解析结果类型
pub type AvatarResult = Result<String, AvatarError>;

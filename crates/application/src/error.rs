use domain::{AvatarError, DomainError};
use thiserror::Error;

use crate::avatar_store::AvatarStoreError;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),
    #[error("avatar error: {0}")]
    Avatar(#[from] AvatarError),
    #[error("avatar storage error: {0}")]
    Storage(#[from] AvatarStoreError),
    #[error("payload too large: limit is {limit} bytes")]
    PayloadTooLarge { limit: usize },
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl ApplicationError {
    /// 创建基础设施错误
    pub fn infrastructure(message: impl Into<String>) -> Self {
        ApplicationError::Infrastructure(message.into())
    }
}

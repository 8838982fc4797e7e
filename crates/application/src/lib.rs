//! 应用层实现。
//!
//! 这里提供围绕头像领域模型的用例服务，处理上传校验、阻塞调用的线程切换，
//! 以及对外部适配器（例如头像存储）的抽象。

pub mod avatar_store;
pub mod error;
pub mod services;

pub use avatar_store::{AvatarStore, AvatarStoreError};
pub use error::ApplicationError;
pub use services::{
    AvatarService, AvatarServiceDependencies, UploadAvatarRequest, ALLOWED_AVATAR_EXTENSIONS,
};

//! 基础设施层实现。
//!
//! 提供本地头像目录查找、头像文件存储，以及按配置组装头像回退链。

pub mod avatar_store;
pub mod builder;
pub mod file_system_avatar;

pub use avatar_store::LocalAvatarStore;
pub use builder::{build_avatar_chain, Infrastructure};
pub use file_system_avatar::FileSystemAvatar;

//! 聊天室头像领域模型
//!
//! 包含聊天用户能力、头像解析策略及有序回退链。

pub mod avatar;
pub mod chat_user;
pub mod errors;

// 重新导出常用类型
pub use avatar::*;
pub use chat_user::*;
pub use errors::*;

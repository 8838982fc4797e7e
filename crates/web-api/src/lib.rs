//! Web API 层。
//!
//! 提供 Axum 路由，把当前用户的头像查询与上传委托给应用层的头像服务，
//! 并以静态文件方式提供本地头像目录。

mod auth;
mod error;
mod routes;
mod state;

pub use auth::{Claims, CurrentUser, JwtService};
pub use config::JwtConfig;
pub use error::ApiError;
pub use routes::{router, AVATAR_FIELD};
pub use state::AppState;

//! 主应用程序入口
//!
//! 加载配置，组装头像回退链，启动 Axum Web API 服务。

use std::sync::Arc;

use application::{AvatarService, AvatarServiceDependencies};
use config::{AppConfig, JwtConfig};
use infrastructure::Infrastructure;
use tracing_subscriber::EnvFilter;
use web_api::{router, AppState, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load()?;
    if config.jwt.secret == JwtConfig::default().secret {
        tracing::warn!("使用开发环境 JWT 密钥，生产环境请设置 APP_JWT__SECRET");
    }

    // 头像回退链只在启动时构造一次
    let infra = Infrastructure::new(&config.avatar);
    let avatar_service = AvatarService::new(AvatarServiceDependencies {
        avatars: infra.avatars.clone(),
        avatar_store: infra.avatar_store.clone(),
        public_path: config.avatar.public_path.clone(),
        max_upload_bytes: config.avatar.max_upload_bytes,
    });

    let jwt_service = Arc::new(JwtService::new(config.jwt.clone()));

    let state = AppState::new(Arc::new(avatar_service), jwt_service, config.avatar.clone());

    // 启动 Web 服务器
    let app = router(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("聊天室头像服务启动在 http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

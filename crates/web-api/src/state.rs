use std::sync::Arc;

use application::AvatarService;
use config::AvatarConfig;

use crate::JwtService;

#[derive(Clone)]
pub struct AppState {
    pub avatar_service: Arc<AvatarService>,
    pub jwt_service: Arc<JwtService>,
    pub avatar_config: Arc<AvatarConfig>,
}

impl AppState {
    pub fn new(
        avatar_service: Arc<AvatarService>,
        jwt_service: Arc<JwtService>,
        avatar_config: AvatarConfig,
    ) -> Self {
        Self {
            avatar_service,
            jwt_service,
            avatar_config: Arc::new(avatar_config),
        }
    }
}

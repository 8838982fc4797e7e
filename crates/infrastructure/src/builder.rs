use std::sync::Arc;

use config::{AvatarConfig, AvatarProviderKind};
use domain::{AuthAvatar, AvatarProvider, GravatarAvatar, TryAvatars};

use crate::{avatar_store::LocalAvatarStore, file_system_avatar::FileSystemAvatar};

/// 按配置顺序构造头像回退链
pub fn build_avatar_chain(config: &AvatarConfig) -> TryAvatars {
    let providers = config
        .providers
        .iter()
        .map(|kind| -> Box<dyn AvatarProvider> {
            match kind {
                AvatarProviderKind::FileSystem => Box::new(FileSystemAvatar::new(
                    config.directory.clone(),
                    config.public_path.clone(),
                )),
                AvatarProviderKind::Auth => Box::new(AuthAvatar),
                AvatarProviderKind::Gravatar => {
                    Box::new(GravatarAvatar::new(config.gravatar_host.clone()))
                }
            }
        })
        .collect();

    TryAvatars::new(providers)
}

/// 头像相关的基础设施组件
#[derive(Clone)]
pub struct Infrastructure {
    pub avatars: Arc<TryAvatars>,
    pub avatar_store: Arc<LocalAvatarStore>,
}

impl Infrastructure {
    pub fn new(config: &AvatarConfig) -> Self {
        let avatars = Arc::new(build_avatar_chain(config));
        tracing::info!(
            providers = ?avatars.provider_names(),
            directory = %config.directory.display(),
            "avatar chain configured"
        );

        Self {
            avatars,
            avatar_store: Arc::new(LocalAvatarStore::new(config.directory.clone())),
        }
    }
}

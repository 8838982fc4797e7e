use std::{path::Path, sync::Arc};

use domain::{AvatarProvider, ChatUser, DomainError};

use crate::{avatar_store::AvatarStore, error::ApplicationError};

/// 允许上传的头像扩展名
pub const ALLOWED_AVATAR_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

#[derive(Debug, Clone)]
pub struct UploadAvatarRequest {
    pub file_name: String,
    pub data: Vec<u8>,
}

pub struct AvatarServiceDependencies {
    /// 启动时构造好的头像回退链
    pub avatars: Arc<dyn AvatarProvider>,
    pub avatar_store: Arc<dyn AvatarStore>,
    /// 本地头像目录对外的 URL 前缀，例如 `/avatars`
    pub public_path: String,
    pub max_upload_bytes: usize,
}

pub struct AvatarService {
    deps: AvatarServiceDependencies,
}

impl AvatarService {
    pub fn new(deps: AvatarServiceDependencies) -> Self {
        Self { deps }
    }

    /// 解析用户的头像 URL
    ///
    /// 文件系统策略会阻塞读取目录，因此在阻塞线程池中执行。
    pub async fn resolve_avatar_url<U>(&self, user: U) -> Result<String, ApplicationError>
    where
        U: ChatUser + 'static,
    {
        let avatars = self.deps.avatars.clone();
        let unique_id = user.unique_id();

        let result = tokio::task::spawn_blocking(move || avatars.avatar_url(&user))
            .await
            .map_err(|err| ApplicationError::infrastructure(format!("avatar task failed: {err}")))?;

        match &result {
            Ok(url) => tracing::debug!(%unique_id, %url, "avatar resolved"),
            Err(err) => tracing::debug!(%unique_id, error = %err, "no avatar available"),
        }

        Ok(result?)
    }

    /// 保存上传的头像，返回可直接使用的头像 URL
    pub async fn upload_avatar<U>(
        &self,
        user: &U,
        request: UploadAvatarRequest,
    ) -> Result<String, ApplicationError>
    where
        U: ChatUser + ?Sized,
    {
        if request.data.is_empty() {
            return Err(DomainError::validation_error("avatar_file", "头像文件不能为空").into());
        }

        if request.data.len() > self.deps.max_upload_bytes {
            return Err(ApplicationError::PayloadTooLarge {
                limit: self.deps.max_upload_bytes,
            });
        }

        let extension = avatar_extension(&request.file_name)?;
        let unique_id = user.unique_id();

        let file_name = self
            .deps
            .avatar_store
            .save(&unique_id, &extension, &request.data)
            .await?;

        tracing::info!(
            %unique_id,
            %file_name,
            size = request.data.len(),
            "avatar uploaded"
        );

        Ok(format!("{}/{}", self.deps.public_path, file_name))
    }
}

/// 取出并校验上传文件的扩展名，统一为小写
fn avatar_extension(file_name: &str) -> Result<String, DomainError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .ok_or_else(|| DomainError::validation_error("avatar_file", "头像文件缺少扩展名"))?;

    if !ALLOWED_AVATAR_EXTENSIONS.contains(&extension.as_str()) {
        return Err(DomainError::validation_error(
            "avatar_file",
            format!("不支持的头像格式: {extension}"),
        ));
    }

    Ok(extension)
}

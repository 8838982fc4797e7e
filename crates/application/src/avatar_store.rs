use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AvatarStoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 上传头像的存储端口
///
/// 文件名为 `<unique_id>.<extension>`，保存后同一用户其他扩展名的旧头像会被移除。
#[async_trait]
pub trait AvatarStore: Send + Sync {
    /// 保存头像，返回存储后的文件名
    async fn save(
        &self,
        unique_id: &str,
        extension: &str,
        data: &[u8],
    ) -> Result<String, AvatarStoreError>;
}

use std::{
    io,
    path::{Path, PathBuf},
};

use application::{AvatarStore, AvatarStoreError};
use async_trait::async_trait;
use tokio::fs;

/// 把上传的头像写入本地头像目录
///
/// 先写入头像目录旁边的临时目录再重命名进来，避免 [`FileSystemAvatar`](crate::FileSystemAvatar)
/// 读到写了一半的文件，也避免临时文件被静态文件服务暴露。
#[derive(Debug, Clone)]
pub struct LocalAvatarStore {
    directory: PathBuf,
    upload_dir: PathBuf,
}

impl LocalAvatarStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        let directory = directory.into();
        let upload_dir = upload_dir_for(&directory);
        Self {
            directory,
            upload_dir,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// 同一用户其他扩展名的旧头像
    async fn previous_uploads(&self, unique_id: &str, keep: &str) -> io::Result<Vec<PathBuf>> {
        let mut stale = Vec::new();
        let mut entries = fs::read_dir(&self.directory).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if name == keep {
                continue;
            }

            let stem = Path::new(name).file_stem().and_then(|s| s.to_str());
            if stem == Some(unique_id) && entry.file_type().await?.is_file() {
                stale.push(entry.path());
            }
        }
        Ok(stale)
    }
}

/// 尽力删除旧头像，返回删除失败的路径
///
/// 新头像已经生效，清理失败只记录告警，不影响上传结果。
async fn remove_stale(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut failed = Vec::new();
    for path in paths {
        match fs::remove_file(path).await {
            Ok(()) => tracing::debug!(path = %path.display(), "removed previous avatar"),
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to remove previous avatar"
                );
                failed.push(path.clone());
            }
        }
    }
    failed
}

/// 头像目录旁边的临时上传目录，与头像目录在同一文件系统上
fn upload_dir_for(directory: &Path) -> PathBuf {
    match (directory.parent(), directory.file_name()) {
        (Some(parent), Some(name)) => {
            parent.join(format!(".{}.uploads", name.to_string_lossy()))
        }
        _ => directory.join("..").join(".avatar-uploads"),
    }
}

#[async_trait]
impl AvatarStore for LocalAvatarStore {
    async fn save(
        &self,
        unique_id: &str,
        extension: &str,
        data: &[u8],
    ) -> Result<String, AvatarStoreError> {
        fs::create_dir_all(&self.directory).await?;
        fs::create_dir_all(&self.upload_dir).await?;

        let file_name = format!("{unique_id}.{extension}");
        let temp_path = self.upload_dir.join(&file_name);
        let final_path = self.directory.join(&file_name);

        fs::write(&temp_path, data).await?;
        if let Err(err) = fs::rename(&temp_path, &final_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(err.into());
        }

        match self.previous_uploads(unique_id, &file_name).await {
            Ok(stale) => {
                remove_stale(&stale).await;
            }
            Err(err) => tracing::warn!(
                directory = %self.directory.display(),
                error = %err,
                "failed to list previous avatars"
            ),
        }

        Ok(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_save_writes_file() {
        let dir = TempDir::new().unwrap();
        let avatars = dir.path().join("avatars");
        let store = LocalAvatarStore::new(&avatars);

        let file_name = store.save("abc", "png", &[1, 2, 3]).await.unwrap();

        assert_eq!(file_name, "abc.png");
        let written = std::fs::read(avatars.join("abc.png")).unwrap();
        assert_eq!(written, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_temp_files_stay_out_of_served_directory() {
        let dir = TempDir::new().unwrap();
        let avatars = dir.path().join("avatars");
        let store = LocalAvatarStore::new(&avatars);

        store.save("abc", "png", b"data").await.unwrap();

        assert_eq!(file_names(&avatars), vec!["abc.png"]);
        assert!(dir.path().join(".avatars.uploads").is_dir());
        assert!(file_names(&dir.path().join(".avatars.uploads")).is_empty());
    }

    #[test]
    fn test_upload_dir_is_sibling() {
        assert_eq!(
            upload_dir_for(Path::new("/srv/chat/avatars")),
            PathBuf::from("/srv/chat/.avatars.uploads")
        );
        assert_eq!(
            upload_dir_for(Path::new("avatars")),
            PathBuf::from(".avatars.uploads")
        );
    }

    #[tokio::test]
    async fn test_save_replaces_previous_upload() {
        let dir = TempDir::new().unwrap();
        let avatars = dir.path().join("avatars");
        std::fs::create_dir(&avatars).unwrap();
        std::fs::write(avatars.join("abc.jpg"), b"old").unwrap();
        std::fs::write(avatars.join("abcd.jpg"), b"other user").unwrap();
        let store = LocalAvatarStore::new(&avatars);

        store.save("abc", "png", b"new").await.unwrap();

        assert_eq!(file_names(&avatars), vec!["abc.png", "abcd.jpg"]);
    }

    #[tokio::test]
    async fn test_save_overwrites_same_extension() {
        let dir = TempDir::new().unwrap();
        let avatars = dir.path().join("avatars");
        let store = LocalAvatarStore::new(&avatars);

        store.save("abc", "png", b"first").await.unwrap();
        store.save("abc", "png", b"second").await.unwrap();

        let written = std::fs::read(avatars.join("abc.png")).unwrap();
        assert_eq!(written, b"second");
    }

    #[tokio::test]
    async fn test_failed_cleanup_is_reported_not_raised() {
        let dir = TempDir::new().unwrap();
        let removable = dir.path().join("abc.gif");
        let missing = dir.path().join("abc.jpg");
        std::fs::write(&removable, b"old").unwrap();

        let failed = remove_stale(&[missing.clone(), removable.clone()]).await;

        assert_eq!(failed, vec![missing]);
        assert!(!removable.exists());
    }
}

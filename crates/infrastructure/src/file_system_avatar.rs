//! 本地头像目录查找
//!
//! 在头像目录中（不递归，跳过子目录）寻找以用户唯一标识开头的文件。

use std::{
    fs,
    path::{Path, PathBuf},
};

use domain::{AvatarError, AvatarProvider, AvatarResult, ChatUser};

/// 本地上传头像策略
///
/// 目录读取失败与未找到匹配文件同样返回 `NoAvatarUrl`，失败原因只写入 debug 日志。
/// 多个文件共享同一前缀时，`<unique_id>.<ext>` 优先，否则按文件名字典序取第一个。
#[derive(Debug, Clone)]
pub struct FileSystemAvatar {
    directory: PathBuf,
    public_path: String,
}

impl FileSystemAvatar {
    pub fn new(directory: impl Into<PathBuf>, public_path: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            public_path: public_path.into(),
        }
    }
}

impl AvatarProvider for FileSystemAvatar {
    fn avatar_url(&self, user: &dyn ChatUser) -> AvatarResult {
        let unique_id = user.unique_id();
        // 空前缀会匹配任意文件
        if unique_id.is_empty() {
            return Err(AvatarError::NoAvatarUrl);
        }

        let entries = match fs::read_dir(&self.directory) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::debug!(
                    directory = %self.directory.display(),
                    error = %err,
                    "avatar directory unreadable"
                );
                return Err(AvatarError::NoAvatarUrl);
            }
        };

        // 文件名主干与唯一标识完全相同的优先，其次才是前缀匹配；同级按字典序
        entries
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().map(|t| !t.is_dir()).unwrap_or(false))
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.starts_with(&unique_id))
            .min_by_key(|name| (!is_own_file(name, &unique_id), name.clone()))
            .map(|name| format!("{}/{}", self.public_path, name))
            .ok_or(AvatarError::NoAvatarUrl)
    }

    fn name(&self) -> &'static str {
        "file_system"
    }
}

/// 文件名去掉扩展名后是否正好是唯一标识
fn is_own_file(name: &str, unique_id: &str) -> bool {
    Path::new(name).file_stem().and_then(|stem| stem.to_str()) == Some(unique_id)
}

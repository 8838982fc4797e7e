//! 并发头像解析测试
//!
//! 验证同一个回退链被多个请求同时使用时结果一致

use application::{AvatarService, AvatarServiceDependencies, AvatarStore, AvatarStoreError};
use async_trait::async_trait;
use domain::{AuthAvatar, ChatUser, ChatUserProfile, GravatarAvatar, TryAvatars};
use std::sync::Arc;

/// 解析测试用不到存储
struct UnusedStore;

#[async_trait]
impl AvatarStore for UnusedStore {
    async fn save(
        &self,
        _unique_id: &str,
        _extension: &str,
        _data: &[u8],
    ) -> Result<String, AvatarStoreError> {
        Err(std::io::Error::other("storage disabled in this test").into())
    }
}

fn shared_service() -> Arc<AvatarService> {
    let chain = TryAvatars::default()
        .with(AuthAvatar)
        .with(GravatarAvatar::default());

    Arc::new(AvatarService::new(AvatarServiceDependencies {
        avatars: Arc::new(chain),
        avatar_store: Arc::new(UnusedStore),
        public_path: "/avatars".to_string(),
        max_upload_bytes: 1024,
    }))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_resolution_is_consistent() {
    let service = shared_service();

    let handles: Vec<_> = (0..64)
        .map(|i| {
            let service = service.clone();
            tokio::spawn(async move {
                let avatar_url = if i % 2 == 0 {
                    format!("http://auth/{i}.png")
                } else {
                    String::new()
                };
                let user = ChatUserProfile::new(format!("user{i}"), avatar_url).unwrap();
                let expected = if i % 2 == 0 {
                    format!("http://auth/{i}.png")
                } else {
                    format!("//www.gravatar.com/avatar/{}", user.unique_id())
                };
                (service.resolve_avatar_url(user).await.unwrap(), expected)
            })
        })
        .collect();

    for handle in handles {
        let (actual, expected) = handle.await.unwrap();
        assert_eq!(actual, expected);
    }
}

#[tokio::test]
async fn test_repeated_resolution_is_idempotent() {
    let service = shared_service();

    let mut results = Vec::new();
    for _ in 0..5 {
        let user = ChatUserProfile::from_email("repeat@example.com", "").unwrap();
        results.push(service.resolve_avatar_url(user).await.unwrap());
    }

    assert!(results.windows(2).all(|pair| pair[0] == pair[1]));
}

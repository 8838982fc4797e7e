use std::{path::PathBuf, sync::Arc};

use application::{AvatarService, AvatarServiceDependencies};
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, Response},
    Router,
};
use config::{AvatarConfig, AvatarProviderKind, JwtConfig};
use domain::ChatUserProfile;
use infrastructure::Infrastructure;
use tempfile::TempDir;
use web_api::{router, AppState, JwtService};

pub const BOUNDARY: &str = "avatar-test-boundary";

pub struct TestApp {
    pub router: Router,
    pub jwt_service: Arc<JwtService>,
    pub root_dir: TempDir,
}

impl TestApp {
    pub fn new(providers: Vec<AvatarProviderKind>) -> Self {
        let root_dir = TempDir::new().unwrap();
        let avatar_config = AvatarConfig {
            directory: root_dir.path().join("avatars"),
            providers,
            max_upload_bytes: 1024,
            ..AvatarConfig::default()
        };

        let infra = Infrastructure::new(&avatar_config);
        let avatar_service = AvatarService::new(AvatarServiceDependencies {
            avatars: infra.avatars.clone(),
            avatar_store: infra.avatar_store.clone(),
            public_path: avatar_config.public_path.clone(),
            max_upload_bytes: avatar_config.max_upload_bytes,
        });
        let jwt_service = Arc::new(JwtService::new(JwtConfig::default()));

        let state = AppState::new(Arc::new(avatar_service), jwt_service.clone(), avatar_config);

        Self {
            router: router(state),
            jwt_service,
            root_dir,
        }
    }

    pub fn avatar_dir(&self) -> PathBuf {
        self.root_dir.path().join("avatars")
    }

    pub fn token_for(&self, user: &ChatUserProfile) -> String {
        self.jwt_service.generate_token(user).unwrap()
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        use tower::ServiceExt;
        self.router.clone().oneshot(request).await.unwrap()
    }
}

pub fn get_with_token(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

pub fn multipart_upload(token: &str, field: &str, file_name: &str, data: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/v1/me/avatar")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

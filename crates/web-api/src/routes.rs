use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::{services::ServeDir, trace::TraceLayer};

use application::UploadAvatarRequest;

use crate::{auth::CurrentUser, error::ApiError, state::AppState};

/// 上传表单中头像文件的字段名
pub const AVATAR_FIELD: &str = "avatar_file";

/// multipart 边界和表单头的余量
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

#[derive(Debug, Serialize)]
struct AvatarResponse {
    avatar_url: String,
}

pub fn router(state: AppState) -> Router {
    let avatar_files = ServeDir::new(&state.avatar_config.directory);
    let public_path = state.avatar_config.public_path.clone();

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api_routes(&state))
        .nest_service(&public_path, avatar_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes(state: &AppState) -> Router<AppState> {
    let body_limit = upload_body_limit(state.avatar_config.max_upload_bytes);

    Router::new().route(
        "/me/avatar",
        get(get_my_avatar)
            .post(upload_my_avatar)
            .layer(DefaultBodyLimit::max(body_limit)),
    )
}

/// 请求体上限：头像大小加上 multipart 余量，超大配置时封顶
fn upload_body_limit(max_upload_bytes: usize) -> usize {
    max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn get_my_avatar(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<AvatarResponse>, ApiError> {
    let avatar_url = state.avatar_service.resolve_avatar_url(user).await?;
    Ok(Json(AvatarResponse { avatar_url }))
}

async fn upload_my_avatar(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<AvatarResponse>), ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(AVATAR_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await?;

        let avatar_url = state
            .avatar_service
            .upload_avatar(
                &user,
                UploadAvatarRequest {
                    file_name,
                    data: data.to_vec(),
                },
            )
            .await?;

        return Ok((StatusCode::CREATED, Json(AvatarResponse { avatar_url })));
    }

    Err(ApiError::bad_request(format!(
        "Missing '{}' field in multipart form",
        AVATAR_FIELD
    )))
}

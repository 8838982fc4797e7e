mod avatar_service;

pub use avatar_service::{
    AvatarService, AvatarServiceDependencies, UploadAvatarRequest, ALLOWED_AVATAR_EXTENSIONS,
};

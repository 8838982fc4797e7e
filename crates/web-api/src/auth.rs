//! JWT 认证模块
//!
//! 提供 JWT token 生成、验证，以及把 token 转成当前聊天用户的提取器。

use axum::{extract::FromRequestParts, http::request::Parts, http::HeaderMap};
use config::JwtConfig;
use domain::{ChatUser, ChatUserProfile};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, state::AppState};

/// JWT Claims 结构
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// 用户唯一标识
    pub sub: String,
    /// 认证提供方给出的头像
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub exp: i64, // 过期时间 (Unix timestamp)
}

/// JWT Token 服务
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_ref());
        let decoding_key = DecodingKey::from_secret(config.secret.as_ref());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// 生成 JWT token
    pub fn generate_token(&self, user: &dyn ChatUser) -> Result<String, ApiError> {
        let now = chrono::Utc::now();
        let exp = now + chrono::Duration::hours(self.config.expiration_hours);
        let avatar_url = user.avatar_url();

        let claims = Claims {
            sub: user.unique_id(),
            avatar_url: (!avatar_url.is_empty()).then_some(avatar_url),
            exp: exp.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|err| ApiError::unauthorized(format!("Token generation failed: {}", err)))
    }

    /// 验证并解析 JWT token
    pub fn verify_token(&self, token: &str) -> Result<Claims, ApiError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|token_data| token_data.claims)
            .map_err(|err| ApiError::unauthorized(format!("Invalid token: {}", err)))
    }

    /// 从 headers 中提取和验证 token
    pub fn extract_user_from_headers(&self, headers: &HeaderMap) -> Result<ChatUserProfile, ApiError> {
        let auth_header = headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|header| header.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Missing authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::unauthorized("Invalid authorization header format"))?;

        let claims = self.verify_token(token)?;
        ChatUserProfile::new(claims.sub, claims.avatar_url.unwrap_or_default())
            .map_err(|err| ApiError::unauthorized(format!("Invalid token subject: {}", err)))
    }
}

/// 当前已认证的聊天用户
#[derive(Debug, Clone)]
pub struct CurrentUser(pub ChatUserProfile);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        state
            .jwt_service
            .extract_user_from_headers(&parts.headers)
            .map(CurrentUser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::AUTHORIZATION, HeaderValue};

    fn service() -> JwtService {
        JwtService::new(JwtConfig::default())
    }

    #[test]
    fn test_token_round_trip_keeps_avatar_hint() {
        let jwt = service();
        let user = ChatUserProfile::new("abc", "http://auth/avatar.png").unwrap();
        let token = jwt.generate_token(&user).unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );

        let extracted = jwt.extract_user_from_headers(&headers).unwrap();
        assert_eq!(extracted, user);
    }

    #[test]
    fn test_token_without_avatar_url() {
        let jwt = service();
        let user = ChatUserProfile::new("abc", "").unwrap();
        let claims = jwt.verify_token(&jwt.generate_token(&user).unwrap()).unwrap();

        assert_eq!(claims.sub, "abc");
        assert!(claims.avatar_url.is_none());
    }

    #[test]
    fn test_rejects_missing_or_malformed_header() {
        let jwt = service();
        assert!(jwt.extract_user_from_headers(&HeaderMap::new()).is_err());

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Token abc"));
        assert!(jwt.extract_user_from_headers(&headers).is_err());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer not-a-jwt"));
        assert!(jwt.extract_user_from_headers(&headers).is_err());
    }
}

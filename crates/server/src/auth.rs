//! Bearer tokens and the authenticated-user extractor.
//!
//! Tokens are HS256 JWTs whose subject is the user id. Clients may send
//! them as `Authorization: Bearer <token>` or in the `x-auth-token` header.

use axum::{
    Json,
    extract::{FromRequestParts, State},
    http::{HeaderMap, HeaderName, HeaderValue, request::Parts},
};
use axum_extra::headers::{
    Authorization, Error as HeaderError, Header, HeaderMapExt, authorization::Bearer,
};
use chrono::{TimeDelta, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{
    ServerError, ServerState,
    extract::ApiJson,
    types::user::{Login, Token, UserView},
};
use engine::{User, UserId};

pub(crate) const NO_TOKEN: &str = "No token, authorization denied";
pub(crate) const INVALID_TOKEN: &str = "Token is not valid";

static AUTH_TOKEN_HEADER: HeaderName = HeaderName::from_static("x-auth-token");

/// `TypedHeader` for the legacy token header.
#[derive(Debug)]
struct AuthTokenHeader(String);

impl Header for AuthTokenHeader {
    fn name() -> &'static HeaderName {
        &AUTH_TOKEN_HEADER
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, HeaderError>
    where
        Self: Sized,
        I: Iterator<Item = &'i HeaderValue>,
    {
        let value = values.next().ok_or_else(HeaderError::invalid)?;
        let Ok(value) = value.to_str() else {
            return Err(HeaderError::invalid());
        };
        let value = value.trim();
        if value.is_empty() {
            return Err(HeaderError::invalid());
        }

        Ok(AuthTokenHeader(value.to_string()))
    }

    fn encode<E: Extend<HeaderValue>>(&self, values: &mut E) {
        match HeaderValue::from_str(&self.0) {
            Ok(value) => values.extend(std::iter::once(value)),
            Err(_) => tracing::error!("failed to encode x-auth-token header"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: UserId,
    iat: i64,
    exp: i64,
}

/// Signing material and lifetime for issued tokens.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: TimeDelta,
}

impl TokenKeys {
    pub fn new(secret: &str, ttl: TimeDelta) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn issue(&self, user: UserId) -> Result<String, ServerError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&jsonwebtoken::Header::default(), &claims, &self.encoding)
            .map_err(|err| ServerError::Internal(format!("failed to sign token: {err}")))
    }

    pub fn verify(&self, token: &str) -> Result<UserId, ServerError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims.sub)
            .map_err(|err| {
                tracing::debug!("rejected token: {err}");
                ServerError::Unauthorized(INVALID_TOKEN)
            })
    }
}

fn request_token(headers: &HeaderMap) -> Option<String> {
    if let Some(Authorization(bearer)) = headers.typed_get::<Authorization<Bearer>>() {
        return Some(bearer.token().to_string());
    }
    headers.typed_get::<AuthTokenHeader>().map(|header| header.0)
}

/// The user a request acts on behalf of.
///
/// Fails with 401 when the token is missing, malformed, expired, or names a
/// user that no longer exists.
pub(crate) struct AuthUser(pub User);

impl FromRequestParts<ServerState> for AuthUser {
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        let token = request_token(&parts.headers).ok_or(ServerError::Unauthorized(NO_TOKEN))?;
        let user_id = state.tokens.verify(&token)?;
        let user = state
            .engine
            .user(user_id)
            .await?
            .ok_or(ServerError::Unauthorized(INVALID_TOKEN))?;

        Ok(AuthUser(user))
    }
}

pub(crate) fn user_view(user: User) -> UserView {
    UserView {
        id: user.id.into(),
        name: user.name,
        email: user.email,
        date: user.date,
    }
}

pub(crate) async fn login(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<Login>,
) -> Result<Json<Token>, ServerError> {
    let user = state
        .engine
        .authenticate(payload.email.as_deref(), payload.password.as_deref())
        .await?;
    tracing::debug!(user = %user.id, "user logged in");

    let token = state.tokens.issue(user.id)?;
    Ok(Json(Token { token }))
}

pub(crate) async fn current_user(AuthUser(user): AuthUser) -> Json<UserView> {
    Json(user_view(user))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> TokenKeys {
        TokenKeys::new("test-secret", TimeDelta::hours(1))
    }

    #[test]
    fn issued_token_verifies_to_the_same_user() {
        let user = UserId::new();
        let token = keys().issue(user).unwrap();
        assert_eq!(keys().verify(&token).ok(), Some(user));
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let token = TokenKeys::new("other-secret", TimeDelta::hours(1))
            .issue(UserId::new())
            .unwrap();
        assert!(keys().verify(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = TokenKeys::new("test-secret", TimeDelta::hours(-1))
            .issue(UserId::new())
            .unwrap();
        assert!(keys().verify(&token).is_err());
    }

    #[test]
    fn bearer_header_wins_over_legacy_header() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer abc"));
        headers.insert("x-auth-token", HeaderValue::from_static("def"));
        assert_eq!(request_token(&headers).as_deref(), Some("abc"));
    }

    #[test]
    fn legacy_header_is_accepted() {
        let mut headers = HeaderMap::new();
        headers.insert("x-auth-token", HeaderValue::from_static("def"));
        assert_eq!(request_token(&headers).as_deref(), Some("def"));
    }

    #[test]
    fn missing_or_blank_token_is_none() {
        let mut headers = HeaderMap::new();
        assert_eq!(request_token(&headers), None);
        headers.insert("x-auth-token", HeaderValue::from_static(" "));
        assert_eq!(request_token(&headers), None);
    }
}

//! Session and builder tokens
//!
//! Both are HS256 JWTs, built by hand on `hmac` + `sha2`. Session tokens are
//! signed with `AUTH_SECRET` and arrive as a bearer token or the
//! `session_token` cookie. Builder tokens are signed with the DocuSeal API key
//! and handed to the embedded template builder.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::AppState;

type HmacSha256 = Hmac<Sha256>;

pub const SESSION_COOKIE: &str = "session_token";

/// Session lifetime in seconds (30 days)
pub const SESSION_TTL: u64 = 30 * 24 * 60 * 60;

/// Builder token lifetime in seconds
pub const BUILDER_TOKEN_TTL: u64 = 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("invalid token format")]
    Format,
    #[error("invalid signature")]
    Signature,
    #[error("unsupported token header")]
    Header,
    #[error("invalid token payload")]
    Payload,
    #[error("token expired")]
    Expired,
    #[error("invalid signing key")]
    Key,
}

#[derive(Debug, Serialize, Deserialize)]
struct JwtHeader {
    alg: String,
    typ: String,
}

impl Default for JwtHeader {
    fn default() -> Self {
        Self {
            alg: "HS256".to_string(),
            typ: "JWT".to_string(),
        }
    }
}

/// Claims carried by a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub email: String,
    pub iat: u64,
    pub exp: u64,
}

/// Claims the DocuSeal builder expects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    pub iat: u64,
    pub exp: u64,
}

/// Current Unix time in seconds
pub fn now() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or(0)
}

fn mac(secret: &str) -> Result<HmacSha256, TokenError> {
    HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| TokenError::Key)
}

pub fn encode_token<T: Serialize>(claims: &T, secret: &str) -> Result<String, TokenError> {
    let header = serde_json::to_vec(&JwtHeader::default()).map_err(|_| TokenError::Header)?;
    let payload = serde_json::to_vec(claims).map_err(|_| TokenError::Payload)?;
    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(header),
        URL_SAFE_NO_PAD.encode(payload)
    );

    let mut mac = mac(secret)?;
    mac.update(signing_input.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    Ok(format!("{}.{}", signing_input, signature))
}

/// Verify the signature and header, then decode the claims. Expiry is
/// checked by the caller.
pub fn decode_token<T: DeserializeOwned>(token: &str, secret: &str) -> Result<T, TokenError> {
    let mut parts = token.split('.');
    let (Some(header_b64), Some(payload_b64), Some(signature_b64), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(TokenError::Format);
    };

    let signature = URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|_| TokenError::Signature)?;
    let mut mac = mac(secret)?;
    mac.update(header_b64.as_bytes());
    mac.update(b".");
    mac.update(payload_b64.as_bytes());
    mac.verify_slice(&signature)
        .map_err(|_| TokenError::Signature)?;

    let header: JwtHeader = URL_SAFE_NO_PAD
        .decode(header_b64)
        .ok()
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .ok_or(TokenError::Header)?;
    if header.alg != "HS256" {
        return Err(TokenError::Header);
    }

    URL_SAFE_NO_PAD
        .decode(payload_b64)
        .ok()
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .ok_or(TokenError::Payload)
}

/// Sign a session token for `email`
pub fn issue_session(email: &str, secret: &str, now: u64) -> Result<String, TokenError> {
    let claims = SessionClaims {
        sub: email.to_string(),
        email: email.to_string(),
        iat: now,
        exp: now + SESSION_TTL,
    };
    encode_token(&claims, secret)
}

pub fn verify_session(token: &str, secret: &str, now: u64) -> Result<SessionClaims, TokenError> {
    let claims: SessionClaims = decode_token(token, secret)?;
    if claims.exp <= now {
        return Err(TokenError::Expired);
    }
    Ok(claims)
}

/// Token for the embedded DocuSeal builder, valid for an hour
pub fn builder_token(user_email: Option<&str>, api_key: &str, now: u64) -> Result<String, TokenError> {
    let claims = BuilderClaims {
        user_email: user_email.map(str::to_string),
        iat: now,
        exp: now + BUILDER_TOKEN_TTL,
    };
    encode_token(&claims, api_key)
}

/// Session token from `Authorization: Bearer` or the session cookie
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
}

fn session_from_parts(parts: &Parts, state: &AppState) -> Option<SessionClaims> {
    let secret = state.config.auth_secret.as_deref()?;
    let token = token_from_headers(&parts.headers)?;
    match verify_session(&token, secret, now()) {
        Ok(claims) => Some(claims),
        Err(e) => {
            debug!("Ignoring session token: {}", e);
            None
        }
    }
}

/// A request that must carry a valid session
#[derive(Debug, Clone)]
pub struct RequireSession(pub SessionClaims);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for RequireSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        session_from_parts(parts, state)
            .map(RequireSession)
            .ok_or_else(ApiError::unauthorized)
    }
}

/// A request that may proceed without a session
#[derive(Debug, Clone)]
pub struct MaybeSession(pub Option<SessionClaims>);

impl MaybeSession {
    pub fn is_anonymous(&self) -> bool {
        self.0.is_none()
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for MaybeSession {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let session = session_from_parts(parts, state);
        if session.is_none() {
            warn!("No session for {} - proceeding as anonymous", parts.uri.path());
        }
        Ok(MaybeSession(session))
    }
}

//! Credential verification seam
//!
//! Routes that need protection go through a single [`TokenVerifier`]
//! capability chosen once at startup, never probed at call time. The default
//! deployment runs open ([`AllowAll`]); setting `API_AUTH_TOKEN` switches to
//! a static bearer-token check.

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use tracing::debug;

use crate::config::Config;
use crate::error::{ApiError, Result};

/// Identity attached to a request after successful verification.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub subject: String,
}

// == Token Verifier ==
/// Capability interface for verifying a bearer credential.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<AuthenticatedUser>;

    /// Whether requests must carry an Authorization header at all.
    fn requires_credential(&self) -> bool {
        true
    }
}

/// Verifier for open deployments: no header required, everything passes.
pub struct AllowAll;

#[async_trait]
impl TokenVerifier for AllowAll {
    async fn verify(&self, _token: &str) -> Result<AuthenticatedUser> {
        Ok(AuthenticatedUser {
            subject: "anonymous".to_string(),
        })
    }

    fn requires_credential(&self) -> bool {
        false
    }
}

/// Verifier that compares against a fixed token from configuration.
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenVerifier for StaticToken {
    async fn verify(&self, token: &str) -> Result<AuthenticatedUser> {
        if token == self.token {
            Ok(AuthenticatedUser {
                subject: "static-token".to_string(),
            })
        } else {
            Err(ApiError::InvalidCredential(
                "Invalid or expired token".to_string(),
            ))
        }
    }
}

/// Selects the concrete verifier for this deployment.
pub fn verifier_from_config(config: &Config) -> Arc<dyn TokenVerifier> {
    match &config.auth_token {
        Some(token) => {
            debug!("static bearer-token verification enabled");
            Arc::new(StaticToken::new(token.clone()))
        }
        None => Arc::new(AllowAll),
    }
}

/// Runs header extraction plus verification for one request.
///
/// Verifiers that require no credential skip header parsing entirely, so
/// open deployments accept requests without any Authorization header.
pub async fn authenticate(
    verifier: &dyn TokenVerifier,
    headers: &HeaderMap,
) -> Result<AuthenticatedUser> {
    if !verifier.requires_credential() {
        return verifier.verify("").await;
    }
    let token = bearer_token(headers)?;
    verifier.verify(token).await
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Result<&str> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::InvalidCredential("Missing authorization header".to_string()))?;

    match header.split(' ').collect::<Vec<_>>().as_slice() {
        ["Bearer", token] if !token.is_empty() => Ok(token),
        _ => Err(ApiError::InvalidCredential(
            "Invalid authorization header format".to_string(),
        )),
    }
}

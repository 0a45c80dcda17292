//! Bearer token resolution.
//!
//! A request carrying `Authorization: Bearer <token>` goes through two stages:
//!
//! 1. the token is authenticated by a [`TokenVerifier`] (signature, audience,
//!    issuer, algorithm);
//! 2. its payload is decoded to read the `sub` claim, which must name a
//!    local user.
//!
//! Success yields an [`AuthContext`]; any failure is an [`AuthError`] and the
//! request is rejected with 401.

use std::sync::Arc;

use async_trait::async_trait;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    error::{AppError, AppResult},
    models::AuthContext,
    repository::UserStore,
};

const BEARER_PREFIX: &str = "Bearer ";

/// Reason a request was refused
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("missing authorization header")]
    MissingHeader,

    #[error("authorization header is not a bearer token")]
    MalformedHeader,

    #[error("token rejected: {0}")]
    InvalidToken(String),

    #[error("signing keys unavailable: {0}")]
    KeysUnavailable(String),

    #[error("token has no subject claim")]
    MissingSubject,

    #[error("no user for subject {0}")]
    UnknownSubject(String),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Unauthorized(err.to_string())
    }
}

/// Authenticates a bearer token against the identity provider
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<(), AuthError>;
}

/// Extract the token from an `Authorization` header value
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::MissingHeader)?;
    header
        .strip_prefix(BEARER_PREFIX)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MalformedHeader)
}

#[derive(Deserialize)]
struct SubjectClaims {
    sub: Option<String>,
}

/// Read the `sub` claim without checking the signature.
///
/// Only structure is validated here; authenticity is the verifier's job.
pub fn decode_subject(token: &str) -> Result<String, AuthError> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<SubjectClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

    data.claims
        .sub
        .filter(|sub| !sub.is_empty())
        .ok_or(AuthError::MissingSubject)
}

/// Maps bearer tokens to local users
#[derive(Clone)]
pub struct IdentityResolver {
    verifier: Arc<dyn TokenVerifier>,
    users: Arc<dyn UserStore>,
}

impl IdentityResolver {
    pub fn new(verifier: Arc<dyn TokenVerifier>, users: Arc<dyn UserStore>) -> Self {
        Self { verifier, users }
    }

    /// Resolve the caller from the raw `Authorization` header value
    pub async fn resolve(&self, authorization: Option<&str>) -> AppResult<AuthContext> {
        let token = bearer_token(authorization)?;

        self.verifier.verify(token).await?;
        tracing::trace!("Token authenticated");

        let auth0_id = decode_subject(token)?;

        let user = self
            .users
            .find_by_auth0_id(&auth0_id)
            .await?
            .ok_or_else(|| AuthError::UnknownSubject(auth0_id.clone()))?;

        tracing::debug!(auth0_id = %auth0_id, user_id = %user.id, "Caller resolved");

        Ok(AuthContext {
            auth0_id,
            user_id: user.id,
        })
    }
}

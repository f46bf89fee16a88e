//! Bearer token resolution against the hosted auth service

use crate::config::AuthConfig;
use crate::error::{AppError, AppResult, ExternalError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

/// Resolves an access token to the id of the user it was issued to
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Rejected or expired tokens yield an authentication error
    async fn resolve_user(&self, token: &str) -> AppResult<Uuid>;
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: Uuid,
}

/// Identity provider backed by the auth service's `/auth/v1/user` endpoint
pub struct AuthApiIdentity {
    base_url: String,
    anon_key: String,
    client: Client,
}

impl AuthApiIdentity {
    pub fn new(config: &AuthConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            client,
        })
    }
}

#[async_trait]
impl IdentityProvider for AuthApiIdentity {
    async fn resolve_user(&self, token: &str) -> AppResult<Uuid> {
        let response = self
            .client
            .get(format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                warn!("Auth service unreachable: {}", e);
                AppError::from(ExternalError::Identity {
                    message: e.to_string(),
                })
            })?;

        match response.status() {
            status if status.is_success() => {
                let user: AuthUser = response.json().await.map_err(|e| {
                    AppError::from(ExternalError::Identity {
                        message: format!("Malformed user response: {}", e),
                    })
                })?;
                debug!("Resolved bearer token to user {}", user.id);
                Ok(user.id)
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(AppError::authentication("Unauthorized"))
            }
            status => {
                warn!("Auth service returned {}", status);
                Err(ExternalError::Identity {
                    message: format!("Auth service returned {}", status),
                }
                .into())
            }
        }
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header value
pub fn bearer_token(header: Option<&str>) -> AppResult<&str> {
    let header = header.ok_or_else(|| AppError::authentication("Missing authorization header"))?;
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::authentication("Unauthorized"))
}

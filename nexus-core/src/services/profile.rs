//! Profile service client: profile reads/edits and password changes
//!
//! Every call requires the current bearer token. The token is read
//! from the key store at call time; a missing token aborts the call
//! locally before any request is built.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::ApiError;
use crate::session::User;
use crate::storage::{KeyStore, AUTH_TOKEN_KEY};

/// Partial profile edit; absent fields are left untouched server-side
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.avatar.is_none() && self.bio.is_none()
    }
}

#[async_trait]
pub trait ProfileApi: Send + Sync {
    async fn get_profile(&self) -> Result<User, ApiError>;
    async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError>;
    async fn change_password(&self, current: &str, new_password: &str) -> Result<(), ApiError>;
}

pub struct HttpProfileService {
    client: reqwest::Client,
    base_url: String,
    store: Arc<dyn KeyStore>,
}

impl HttpProfileService {
    pub fn new(base_url: impl Into<String>, store: Arc<dyn KeyStore>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            store,
        }
    }

    fn bearer_token(&self) -> Result<String, ApiError> {
        self.store.get(AUTH_TOKEN_KEY).ok_or(ApiError::MissingToken)
    }
}

#[derive(Deserialize)]
struct ProfileResponse {
    user: User,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordChangeRequest<'a> {
    current_password: &'a str,
    new_password: &'a str,
}

#[async_trait]
impl ProfileApi for HttpProfileService {
    async fn get_profile(&self) -> Result<User, ApiError> {
        let token = self.bearer_token()?;
        let url = format!("{}/api/user/profile", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(ApiError::from_transport)?;

        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }

        let body: ProfileResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Setup(e.to_string()))?;
        Ok(body.user)
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        let token = self.bearer_token()?;
        let url = format!("{}/api/user/profile", self.base_url);
        let response = self
            .client
            .put(&url)
            .bearer_auth(token)
            .json(update)
            .send()
            .await
            .map_err(ApiError::from_transport)?;

        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }

        let body: ProfileResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Setup(e.to_string()))?;
        Ok(body.user)
    }

    async fn change_password(&self, current: &str, new_password: &str) -> Result<(), ApiError> {
        let token = self.bearer_token()?;
        let url = format!("{}/api/user/change-password", self.base_url);
        let response = self
            .client
            .put(&url)
            .bearer_auth(token)
            .json(&PasswordChangeRequest {
                current_password: current,
                new_password,
            })
            .send()
            .await
            .map_err(ApiError::from_transport)?;

        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }

        Ok(())
    }
}

//! Credential service client: login and registration endpoints

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::ApiError;
use crate::session::User;

/// Successful login payload: bearer token plus the identity record
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[async_trait]
pub trait CredentialApi: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError>;

    /// The registration response carries no session; callers follow up
    /// with a login using the same credentials.
    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(), ApiError>;
}

pub struct HttpCredentialService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCredentialService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[async_trait]
impl CredentialApi for HttpCredentialService {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let url = format!("{}/api/auth/login", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&LoginRequest { email, password })
            .send()
            .await
            .map_err(ApiError::from_transport)?;

        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Setup(e.to_string()))
    }

    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(), ApiError> {
        let url = format!("{}/api/auth/register", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&RegisterRequest {
                username,
                email,
                password,
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

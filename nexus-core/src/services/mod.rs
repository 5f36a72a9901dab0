//! HTTP clients for the remote dashboard API
//!
//! Three consumed services, all plain JSON request/response:
//! - Credential service: login and registration
//! - Stats service: raw system telemetry samples
//! - Profile service: profile edits and password changes (bearer auth)
//!
//! Each concern is a trait so tests can substitute stubs; the `Http*`
//! types are the production implementations.

mod credential;
mod profile;
mod stats;

pub use credential::{CredentialApi, HttpCredentialService, LoginResponse};
pub use profile::{HttpProfileService, ProfileApi, ProfileUpdate};
pub use stats::{HttpStatsService, StatsApi};

use std::collections::HashMap;

use serde::Deserialize;

/// Error taxonomy for every remote call.
///
/// `NoResponse` is a transport failure where no reply arrived,
/// `Server` is a received error status with optional structured body,
/// `MissingToken` is the local precondition raised before a bearer-auth
/// request is even built, and `Setup` covers request construction and
/// body decoding problems.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("no response from server")]
    NoResponse,
    #[error("server rejected the request (status {status})")]
    Server {
        status: u16,
        message: Option<String>,
        field_errors: HashMap<String, String>,
    },
    #[error("no authentication token found")]
    MissingToken,
    #[error("request failed: {0}")]
    Setup(String),
}

impl ApiError {
    /// Single user-facing message: prefer what the server said, fall
    /// back to a fixed generic string per variant.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::NoResponse => "No response from server. Please try again later.".into(),
            ApiError::Server {
                message: Some(message),
                ..
            } => message.clone(),
            ApiError::Server { .. } => "An error occurred. Please try again.".into(),
            ApiError::MissingToken => "No authentication token found".into(),
            ApiError::Setup(_) => "An error occurred. Please try again.".into(),
        }
    }

    /// Per-field validation messages echoed by the server, if any
    pub fn field_errors(&self) -> Option<&HashMap<String, String>> {
        match self {
            ApiError::Server { field_errors, .. } if !field_errors.is_empty() => {
                Some(field_errors)
            }
            _ => None,
        }
    }

    fn from_transport(err: reqwest::Error) -> Self {
        if err.is_builder() || err.is_decode() {
            ApiError::Setup(err.to_string())
        } else {
            ApiError::NoResponse
        }
    }

    async fn from_response(response: reqwest::Response) -> Self {
        #[derive(Deserialize)]
        struct ErrorBody {
            message: Option<String>,
            #[serde(default)]
            errors: HashMap<String, String>,
        }

        let status = response.status().as_u16();
        match response.json::<ErrorBody>().await {
            Ok(body) => ApiError::Server {
                status,
                message: body.message,
                field_errors: body.errors,
            },
            Err(_) => ApiError::Server {
                status,
                message: None,
                field_errors: HashMap::new(),
            },
        }
    }
}

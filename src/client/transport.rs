//! Request/response channel between a client and the server

use crate::auth_server::auth_routes::ApiResponse;
use crate::auth_server::AuthService;
use crate::security::{
    Challenge, KeyRegistration, RegisterClientKeyRequest, SecurityError, SecurityResult,
    VerificationOutcome, VerifySignatureRequest, VerifySignatureResponse,
};
use async_trait::async_trait;
use std::sync::Arc;

/// The boundary operations as seen from a client
#[async_trait]
pub trait AuthTransport: Send + Sync {
    async fn register_client_key(
        &self,
        request: &RegisterClientKeyRequest,
    ) -> SecurityResult<KeyRegistration>;

    async fn verify_signature(
        &self,
        request: &VerifySignatureRequest,
    ) -> SecurityResult<VerificationOutcome>;

    async fn server_public_key(&self) -> SecurityResult<String>;

    async fn issue_challenge(&self) -> SecurityResult<Challenge>;
}

/// In-process transport, calling the service directly
#[async_trait]
impl AuthTransport for AuthService {
    async fn register_client_key(
        &self,
        request: &RegisterClientKeyRequest,
    ) -> SecurityResult<KeyRegistration> {
        AuthService::register_client_key(self, request)
    }

    async fn verify_signature(
        &self,
        request: &VerifySignatureRequest,
    ) -> SecurityResult<VerificationOutcome> {
        AuthService::verify_signature(self, request)
    }

    async fn server_public_key(&self) -> SecurityResult<String> {
        Ok(AuthService::server_public_key(self).to_string())
    }

    async fn issue_challenge(&self) -> SecurityResult<Challenge> {
        AuthService::issue_challenge(self)
    }
}

#[async_trait]
impl<T: AuthTransport + ?Sized> AuthTransport for Arc<T> {
    async fn register_client_key(
        &self,
        request: &RegisterClientKeyRequest,
    ) -> SecurityResult<KeyRegistration> {
        T::register_client_key(&**self, request).await
    }

    async fn verify_signature(
        &self,
        request: &VerifySignatureRequest,
    ) -> SecurityResult<VerificationOutcome> {
        T::verify_signature(&**self, request).await
    }

    async fn server_public_key(&self) -> SecurityResult<String> {
        T::server_public_key(&**self).await
    }

    async fn issue_challenge(&self) -> SecurityResult<Challenge> {
        T::issue_challenge(&**self).await
    }
}

/// HTTP transport against a running server
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn transport_error(e: reqwest::Error) -> SecurityError {
    SecurityError::Transport(e.to_string())
}

/// Outcome for a rejected verification, by API error code
fn outcome_for_code(code: &str) -> Option<VerificationOutcome> {
    match code {
        "UNKNOWN_CLIENT" => Some(VerificationOutcome::UnknownClient),
        "MALFORMED_SIGNATURE" => Some(VerificationOutcome::MalformedSignature),
        "INVALID_SIGNATURE" => Some(VerificationOutcome::Invalid),
        _ => None,
    }
}

#[async_trait]
impl AuthTransport for HttpTransport {
    async fn register_client_key(
        &self,
        request: &RegisterClientKeyRequest,
    ) -> SecurityResult<KeyRegistration> {
        let response: ApiResponse<KeyRegistration> = self
            .http
            .post(self.url("/register_client_public_key"))
            .json(request)
            .send()
            .await
            .map_err(transport_error)?
            .json()
            .await
            .map_err(transport_error)?;

        match (response.data, response.error) {
            (Some(registration), _) if response.success => Ok(registration),
            (_, Some(error)) if error.code == "INVALID_PUBLIC_KEY" => {
                Err(SecurityError::InvalidPublicKey(error.message))
            }
            (_, Some(error)) => Err(SecurityError::Transport(format!(
                "{}: {}",
                error.code, error.message
            ))),
            _ => Err(SecurityError::Transport(
                "registration response carried no data".to_string(),
            )),
        }
    }

    async fn verify_signature(
        &self,
        request: &VerifySignatureRequest,
    ) -> SecurityResult<VerificationOutcome> {
        let response: ApiResponse<VerifySignatureResponse> = self
            .http
            .post(self.url("/verify"))
            .json(request)
            .send()
            .await
            .map_err(transport_error)?
            .json()
            .await
            .map_err(transport_error)?;

        if let Some(result) = response.data.filter(|_| response.success) {
            return Ok(if result.valid {
                VerificationOutcome::Valid
            } else {
                VerificationOutcome::Invalid
            });
        }

        match response.error {
            Some(error) => outcome_for_code(&error.code).ok_or_else(|| {
                SecurityError::Transport(format!("{}: {}", error.code, error.message))
            }),
            None => Err(SecurityError::Transport(
                "verification response carried no result".to_string(),
            )),
        }
    }

    async fn server_public_key(&self) -> SecurityResult<String> {
        self.http
            .get(self.url("/server_public_key"))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(transport_error)?
            .text()
            .await
            .map_err(transport_error)
    }

    async fn issue_challenge(&self) -> SecurityResult<Challenge> {
        self.http
            .get(self.url("/generate_random_message"))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(transport_error)?
            .json()
            .await
            .map_err(transport_error)
    }
}

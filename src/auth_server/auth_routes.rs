//! HTTP API endpoints for key registration, verification and challenges

use crate::auth_server::http_server::AppState;
use crate::security::{
    RegisterClientKeyRequest, SecurityError, VerificationOutcome, VerifySignatureRequest,
    VerifySignatureResponse,
};
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, Result as ActixResult};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Standard API response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(error: ApiError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

/// API error response structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub details: HashMap<String, serde_json::Value>,
}

impl ApiError {
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            details: HashMap::new(),
        }
    }

    pub fn with_details(mut self, key: &str, value: serde_json::Value) -> Self {
        self.details.insert(key.to_string(), value);
        self
    }

    /// HTTP status for this error code
    pub fn status(&self) -> StatusCode {
        match self.code.as_str() {
            "INTERNAL_ERROR" => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<SecurityError> for ApiError {
    fn from(error: SecurityError) -> Self {
        let message = error.to_string();
        match error {
            SecurityError::InvalidPublicKey(_) => ApiError::new("INVALID_PUBLIC_KEY", &message),
            SecurityError::UnknownClient(client_id) => {
                ApiError::new("UNKNOWN_CLIENT", &message)
                    .with_details("client_id", serde_json::Value::String(client_id))
            }
            SecurityError::MalformedSignature(reason) => {
                ApiError::new("MALFORMED_SIGNATURE", &message)
                    .with_details("reason", serde_json::Value::String(reason))
            }
            SecurityError::InvalidSignature => ApiError::new("INVALID_SIGNATURE", &message),
            SecurityError::KeyGenerationFailed(_)
            | SecurityError::KeyUnavailable
            | SecurityError::DirectoryUnavailable(_)
            | SecurityError::Transport(_)
            | SecurityError::ProtocolState(_) => ApiError::new("INTERNAL_ERROR", &message),
        }
    }
}

fn error_response(error: ApiError) -> HttpResponse {
    HttpResponse::build(error.status()).json(ApiResponse::<()>::error(error))
}

/// Register a client public key
///
/// POST /register_client_public_key
pub async fn register_client_public_key(
    app_state: web::Data<AppState>,
    request: web::Json<RegisterClientKeyRequest>,
) -> ActixResult<HttpResponse> {
    info!("API request: Register public key for {}", request.client_id);

    match app_state.service.register_client_key(&request) {
        Ok(registration) => Ok(HttpResponse::Ok().json(ApiResponse::success(registration))),
        Err(e) => Ok(error_response(ApiError::from(e))),
    }
}

/// Verify a client signature
///
/// POST /verify
pub async fn verify_signature(
    app_state: web::Data<AppState>,
    request: web::Json<VerifySignatureRequest>,
) -> ActixResult<HttpResponse> {
    debug!("API request: Verify signature from {}", request.client_id);

    match app_state.service.authenticate(&request) {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success(VerifySignatureResponse {
            client_id: request.client_id.clone(),
            valid: true,
        }))),
        Err(e) => match VerificationOutcome::from_rejection(&e) {
            Some(outcome) => {
                let api_error = ApiError::from(e)
                    .with_details("valid", serde_json::Value::Bool(false))
                    .with_details("outcome", serde_json::Value::String(outcome.to_string()));
                Ok(error_response(api_error))
            }
            None => {
                error!("Verification failed for {}: {}", request.client_id, e);
                Ok(error_response(ApiError::from(e)))
            }
        },
    }
}

/// Server public key as PEM text
///
/// GET /server_public_key
pub async fn get_server_public_key(app_state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok()
        .content_type("application/x-pem-file")
        .body(app_state.service.server_public_key().to_string()))
}

/// Issue a signed random challenge
///
/// GET /generate_random_message
pub async fn generate_random_message(app_state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    match app_state.service.issue_challenge() {
        Ok(challenge) => Ok(HttpResponse::Ok().json(challenge)),
        Err(e) => {
            error!("Failed to issue challenge: {}", e);
            Ok(error_response(ApiError::from(e)))
        }
    }
}

/// Server status
///
/// GET /status
pub async fn get_status(app_state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    match app_state.service.status() {
        Ok(status) => Ok(HttpResponse::Ok().json(ApiResponse::success(status))),
        Err(e) => {
            warn!("Status unavailable: {}", e);
            Ok(error_response(ApiError::from(e)))
        }
    }
}

/// Fallback for unparsable JSON bodies
pub fn json_error_handler(
    err: actix_web::error::JsonPayloadError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    let api_error = ApiError::new("INVALID_REQUEST", &err.to_string());
    actix_web::error::InternalError::from_response(err, error_response(api_error)).into()
}

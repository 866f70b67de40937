use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::notification::{DeliveryError, DispatchError, RegistryError, ValidationError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Request rejected: {message}")]
    Rejected { status: StatusCode, message: String },

    #[error("Unknown channel: {0}")]
    UnknownChannel(String),

    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Bad JSON is a validation failure; content-type and size rejections keep their status
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match &rejection {
            JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
                AppError::Validation(rejection.body_text())
            }
            _ => AppError::Rejected {
                status: rejection.status(),
                message: rejection.body_text(),
            },
        }
    }
}

impl From<DispatchError> for AppError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::UnknownChannel(channel) => AppError::UnknownChannel(channel),
            DispatchError::Delivery(e) => AppError::Delivery(e),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

/// Check if running in production mode (based on RUN_MODE env var)
fn is_production() -> bool {
    std::env::var("RUN_MODE")
        .map(|m| m == "production" || m == "prod")
        .unwrap_or(false)
}

fn redact(log_msg: &str, public_msg: &str) -> String {
    if is_production() {
        public_msg.to_string()
    } else {
        log_msg.to_string()
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Config(_) | AppError::Registry(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Validation(_) | AppError::UnknownChannel(_) => StatusCode::BAD_REQUEST,
            AppError::Rejected { status, .. } => *status,
            AppError::Delivery(_) => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Registry(_) => "REGISTRY_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Rejected { status, .. } => match *status {
                StatusCode::PAYLOAD_TOO_LARGE => "PAYLOAD_TOO_LARGE",
                StatusCode::UNSUPPORTED_MEDIA_TYPE => "UNSUPPORTED_MEDIA_TYPE",
                _ => "BAD_REQUEST",
            },
            AppError::UnknownChannel(_) => "UNKNOWN_CHANNEL",
            AppError::Delivery(_) => "DELIVERY_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let (client_message, log_message) = match &self {
            AppError::Config(e) => {
                let log_msg = e.to_string();
                (redact(&log_msg, "Configuration error"), log_msg)
            }
            AppError::Registry(e) => {
                let log_msg = e.to_string();
                (redact(&log_msg, "Configuration error"), log_msg)
            }
            AppError::Validation(msg) | AppError::Rejected { message: msg, .. } => {
                (msg.clone(), msg.clone())
            }
            AppError::UnknownChannel(channel) => {
                let msg = format!("Unsupported channel: {}", channel);
                (msg.clone(), msg)
            }
            AppError::Delivery(e) => {
                let log_msg = e.to_string();
                (redact(&log_msg, "Delivery failed"), log_msg)
            }
            AppError::Internal(e) => (redact(e, "Internal server error"), e.clone()),
        };

        if status.is_server_error() {
            tracing::error!(
                code = %code,
                status = %status.as_u16(),
                message = %log_message,
                "API error"
            );
        } else {
            tracing::warn!(
                code = %code,
                status = %status.as_u16(),
                message = %log_message,
                "Request rejected"
            );
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: client_message,
            },
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::Channel;

    #[test]
    fn test_dispatch_error_mapping() {
        let err: AppError = DispatchError::UnknownChannel("sms".to_string()).into();
        assert!(matches!(err, AppError::UnknownChannel(ref c) if c == "sms"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "UNKNOWN_CHANNEL");

        let err: AppError = DispatchError::Delivery(DeliveryError::Timeout {
            channel: Channel::Email,
            timeout_ms: 10,
        })
        .into();
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.code(), "DELIVERY_ERROR");
    }

    #[test]
    fn test_validation_error_mapping() {
        let err: AppError = ValidationError::Blank { field: "message" }.into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Validation error: message must not be blank");
    }

    #[test]
    fn test_rejection_keeps_status() {
        let err = AppError::Rejected {
            status: StatusCode::UNSUPPORTED_MEDIA_TYPE,
            message: "Expected request with `Content-Type: application/json`".to_string(),
        };
        assert_eq!(err.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(err.code(), "UNSUPPORTED_MEDIA_TYPE");

        let response = AppError::Rejected {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            message: "length limit exceeded".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_into_response_status() {
        let response = AppError::UnknownChannel("sms".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::Internal("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

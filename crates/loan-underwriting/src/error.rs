use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::underwriting::views::STATUS_FAILED;
use crate::underwriting::{MemoError, UnderwritingError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;
use tracing::{error, warn};

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Json(serde_json::Error),
    Memo(MemoError),
    /// `business_name` is known when the failure came from an HTTP request.
    Underwriting {
        business_name: Option<String>,
        source: UnderwritingError,
    },
}

impl AppError {
    pub fn underwriting(business_name: impl Into<String>, source: UnderwritingError) -> Self {
        Self::Underwriting {
            business_name: Some(business_name.into()),
            source,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Json(err) => write!(f, "invalid application json: {}", err),
            AppError::Memo(err) => write!(f, "memo generator error: {}", err),
            AppError::Underwriting { source, .. } => write!(f, "underwriting error: {}", source),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Json(err) => Some(err),
            AppError::Memo(err) => Some(err),
            AppError::Underwriting { source, .. } => Some(source),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Underwriting {
            business_name,
            source,
        } = self
        {
            return underwriting_failure(business_name, source);
        }

        let status = match self {
            AppError::Json(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        error!(error = %self, "request failed");

        let body = Json(json!({ "status": STATUS_FAILED, "error": self.to_string() }));
        (status, body).into_response()
    }
}

/// Validation failures are the caller's fault (422); pipeline faults are ours (500).
fn underwriting_failure(business_name: Option<String>, source: UnderwritingError) -> Response {
    let business = business_name.as_deref().unwrap_or_default();

    match source {
        UnderwritingError::Validation(err) => {
            warn!(business, error = %err, "rejected loan application");
            let body = json!({ "status": STATUS_FAILED, "error": err.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
        }
        UnderwritingError::Pipeline(err) => {
            error!(business, error = %err, "underwriting pipeline fault");
            let mut body = json!({ "status": STATUS_FAILED, "error": err.to_string() });
            if let Some(name) = business_name {
                body["business_name"] = json!(name);
            }
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<MemoError> for AppError {
    fn from(value: MemoError) -> Self {
        Self::Memo(value)
    }
}

impl From<UnderwritingError> for AppError {
    fn from(value: UnderwritingError) -> Self {
        Self::Underwriting {
            business_name: None,
            source: value,
        }
    }
}

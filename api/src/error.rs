use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::subscan::SubscanCode;

/// Failures the proxy reports to its callers
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Missing required fields: network and address")]
    MissingField,

    #[error("Invalid network name: {network}")]
    InvalidNetwork { network: String },

    #[error("{message}")]
    Application { code: i64, message: String },

    #[error("Subscan request failed with status {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Failed to reach Subscan: {message}")]
    Transport { message: String },

    #[error("Invalid response from Subscan: {message}")]
    Decode { message: String },
}

/// JSON body of every error response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ProxyError {
    /// Application error with the upstream message, or a default for the code
    pub fn application(code: i64, message: &str) -> Self {
        let message = if message.trim().is_empty() {
            SubscanCode::from_code(code).default_message().to_string()
        } else {
            message.to_string()
        };
        ProxyError::Application { code, message }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ProxyError::MissingField => 400,
            ProxyError::InvalidNetwork { .. } => 400,
            ProxyError::Application { code, .. } => SubscanCode::from_code(*code).http_status(),
            ProxyError::Upstream { .. } => 500,
            ProxyError::Transport { .. } => 500,
            ProxyError::Decode { .. } => 500,
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            error: self.to_string(),
        }
    }
}

#[cfg(feature = "server")]
impl axum::response::IntoResponse for ProxyError {
    fn into_response(self) -> axum::response::Response {
        let status = axum::http::StatusCode::from_u16(self.status_code())
            .unwrap_or(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
        (status, axum::Json(self.body())).into_response()
    }
}

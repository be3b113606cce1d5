//! Error types and the client-facing error envelope.
//!
//! Every error response the service produces has the same JSON shape:
//!
//! ```json
//! {"code": 400, "message": "Type mismatch.", "version": "1.0"}
//! ```
//!
//! | `ApiError` | Status | Message |
//! |---|---|---|
//! | `Validation(MissingField)` | 400 | `Missing 'User-Agent' header parameter: '<name>'` |
//! | `Validation(MissingParam)` | 400 | `Required <type> parameter '<name>' is not present` |
//! | `Validation(TypeMismatch)` | 400 | `Type mismatch.` |
//! | `RouteNotFound` | 404 | `No matching handler` |
//! | `Timeout` | 504 | `Request timed out` |
//! | `Internal` | 500 | `Internal server error` |

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::params::ParamType;

/// Version string carried by every [`ErrorEnvelope`].
pub const ENVELOPE_VERSION: &str = "1.0";

/// Result type alias using [`ApiError`].
pub type ApiResult<T> = Result<T, ApiError>;

/// First failing check of a request.
///
/// Validation stops at the first failure, so a request yields at most one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    /// A required User-Agent field is absent, empty or `"0"`.
    #[error("Missing 'User-Agent' header parameter: '{0}'")]
    MissingField(String),

    /// A required query parameter is absent or empty.
    #[error("Required {ty} parameter '{name}' is not present")]
    MissingParam {
        /// Parameter name
        name: String,
        /// Declared type
        ty: ParamType,
    },

    /// A numeric query parameter did not parse as its declared type.
    #[error("Type mismatch.")]
    TypeMismatch {
        /// Parameter name
        name: String,
        /// Declared type
        ty: ParamType,
    },
}

impl ValidationFailure {
    /// Creates a missing User-Agent field failure.
    #[must_use]
    pub fn missing_field(name: impl Into<String>) -> Self {
        Self::MissingField(name.into())
    }

    /// Creates a missing query parameter failure.
    #[must_use]
    pub fn missing_param(name: impl Into<String>, ty: ParamType) -> Self {
        Self::MissingParam {
            name: name.into(),
            ty,
        }
    }

    /// Creates a type mismatch failure.
    #[must_use]
    pub fn type_mismatch(name: impl Into<String>, ty: ParamType) -> Self {
        Self::TypeMismatch {
            name: name.into(),
            ty,
        }
    }

    /// Returns the name of the field or parameter that failed.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::MissingField(name)
            | Self::MissingParam { name, .. }
            | Self::TypeMismatch { name, .. } => name,
        }
    }
}

/// Client-facing request failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request failed header or query validation.
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    /// No route under the API prefix matches the request.
    #[error("No matching handler")]
    RouteNotFound,

    /// The request did not complete within the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// An unexpected fault. The detail is logged, never sent to clients.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal(detail.into())
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::RouteNotFound => StatusCode::NOT_FOUND,
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the message sent to clients.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }

    /// Converts this error to its response envelope.
    #[must_use]
    pub fn to_envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope::new(self.status_code(), self.client_message())
    }
}

/// The JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// HTTP status code, repeated in the body.
    pub code: u16,
    /// Human-readable message.
    pub message: String,
    /// Always [`ENVELOPE_VERSION`].
    pub version: String,
}

impl ErrorEnvelope {
    /// Creates an envelope for `status` with the current version.
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code: status.as_u16(),
            message: message.into(),
            version: ENVELOPE_VERSION.to_string(),
        }
    }

    /// Serializes the envelope to JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails, which only happens for
    /// writer failures and cannot occur for an in-memory buffer.
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

impl From<&ApiError> for ErrorEnvelope {
    fn from(error: &ApiError) -> Self {
        error.to_envelope()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_field_message() {
        let err = ApiError::from(ValidationFailure::missing_field("uuid"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.client_message(),
            "Missing 'User-Agent' header parameter: 'uuid'"
        );
    }

    #[test]
    fn test_missing_param_message_includes_type() {
        let failure = ValidationFailure::missing_param("os_sdk_version", ParamType::Int);
        assert_eq!(
            failure.to_string(),
            "Required int parameter 'os_sdk_version' is not present"
        );

        let failure = ValidationFailure::missing_param("package_names", ParamType::Set);
        assert_eq!(
            failure.to_string(),
            "Required set parameter 'package_names' is not present"
        );
    }

    #[test]
    fn test_type_mismatch_message_is_generic() {
        let failure = ValidationFailure::type_mismatch("gms_version", ParamType::Double);
        assert_eq!(failure.to_string(), "Type mismatch.");
        assert_eq!(failure.name(), "gms_version");
    }

    #[test]
    fn test_route_not_found_envelope() {
        let envelope = ApiError::RouteNotFound.to_envelope();
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"code": 404, "message": "No matching handler", "version": "1.0"})
        );
    }

    #[test]
    fn test_internal_detail_is_hidden() {
        let err = ApiError::internal("policy document poisoned");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("poisoned"));

        let envelope = ErrorEnvelope::from(&err);
        assert_eq!(envelope.code, 500);
        assert_eq!(envelope.message, "Internal server error");
    }

    #[test]
    fn test_timeout_status() {
        let envelope = ApiError::Timeout.to_envelope();
        assert_eq!(envelope.code, 504);
        assert_eq!(envelope.message, "Request timed out");
    }

    #[test]
    fn test_envelope_json_field_order() {
        let bytes = ErrorEnvelope::new(StatusCode::BAD_REQUEST, "Type mismatch.")
            .to_json()
            .unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"{"code":400,"message":"Type mismatch.","version":"1.0"}"#
        );
    }
}

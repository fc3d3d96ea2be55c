use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum AppError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Upstream timeout: {0}")]
    Timeout(String),

    #[error("Upstream unreachable: {0}")]
    Unreachable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn user_message(&self) -> &str {
        match self {
            Self::InvalidArgument(_) => "The request was missing a caption or had an invalid vote.",
            Self::Unauthenticated(_) => "Sign in with Google to vote.",
            Self::StoreUnavailable(_) => "Something went wrong reaching our data. Please try again.",
            Self::Timeout(_) => "The server took too long to respond. Please try again.",
            Self::Unreachable(_) => "The service is unreachable right now. Please try again later.",
            Self::Config(_) | Self::Internal(_) => "Internal server error",
        }
    }

    /// Diagnostic detail carried by the variant, without the category prefix.
    pub fn details(&self) -> &str {
        match self {
            Self::InvalidArgument(msg)
            | Self::Unauthenticated(msg)
            | Self::StoreUnavailable(msg)
            | Self::Timeout(msg)
            | Self::Unreachable(msg)
            | Self::Config(msg)
            | Self::Internal(msg) => msg,
        }
    }
}

#[cfg(feature = "http")]
mod http_impl {
    use super::AppError;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use axum::Json;

    #[derive(serde::Serialize)]
    struct ErrorResponse<'a> {
        error: &'a str,
        details: &'a str,
    }

    impl AppError {
        pub fn status_code(&self) -> StatusCode {
            match self {
                AppError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
                AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
                AppError::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
                AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
                AppError::Unreachable(_) => StatusCode::SERVICE_UNAVAILABLE,
                AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        }
    }

    impl IntoResponse for AppError {
        fn into_response(self) -> Response {
            let status = self.status_code();
            let body = ErrorResponse {
                error: self.user_message(),
                details: self.details(),
            };
            (status, Json(body)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_details_strip_prefix() {
        let err = AppError::StoreUnavailable("connection reset".to_string());
        assert_eq!(err.details(), "connection reset");
        assert_eq!(err.to_string(), "Store unavailable: connection reset");
    }

    #[test]
    fn test_timeout_message_is_distinct() {
        let timeout = AppError::Timeout("identity".to_string());
        let unreachable = AppError::Unreachable("identity".to_string());
        let store = AppError::StoreUnavailable("identity".to_string());
        assert_ne!(timeout.user_message(), unreachable.user_message());
        assert_ne!(timeout.user_message(), store.user_message());
    }

    #[test]
    fn test_store_message_is_not_tied_to_saving() {
        let err = AppError::StoreUnavailable("delete failed".to_string());
        let msg = err.user_message();
        assert!(!msg.to_lowercase().contains("save"));
        assert!(!msg.to_lowercase().contains("vote"));
    }

    #[test]
    fn test_roundtrips_through_json() {
        let err = AppError::InvalidArgument("direction must be 1 or -1".to_string());
        let json = serde_json::to_string(&err).unwrap();
        let back: AppError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_status_codes() {
        use axum::http::StatusCode;

        assert_eq!(
            AppError::InvalidArgument(String::new()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Unauthenticated(String::new()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::StoreUnavailable(String::new()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Timeout(String::new()).status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
    }
}

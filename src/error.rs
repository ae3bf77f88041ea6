use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use derive_more::Display;
use serde_json::json;

/// Error taxonomy surfaced by the API.
///
/// Orphan logouts and malformed time-window settings are *not* errors: the
/// session builder self-heals with a partial session and the classifier falls
/// back to default hours.
#[derive(Debug, Display)]
pub enum ServiceError {
    /// Credential not registered, or a gate pass requested while not clocked in.
    #[display(fmt = "ACCESS DENIED: {}", _0)]
    AccessDenied(String),

    /// Biometric bridge unreachable or timed out. Kiosk should fall back to PIN.
    #[display(fmt = "Hardware unavailable: {}", _0)]
    HardwareUnavailable(String),

    /// Retryable write conflict (e.g. a gate pass closed concurrently).
    #[display(fmt = "{}", _0)]
    Conflict(String),

    #[display(fmt = "{} not found", _0)]
    NotFound(String),

    #[display(fmt = "Internal Server Error")]
    Database,
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::AccessDenied(_) => StatusCode::FORBIDDEN,
            ServiceError::HardwareUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Database => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "message": self.to_string()
        }))
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        tracing::error!(error = %e, "Database operation failed");
        ServiceError::Database
    }
}

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rollcall_core::RollcallError;

/// Unified error type for HTTP responses.
///
/// The wire protocol is plain text with fixed bodies the RFID clients match
/// on, so lookup misses and input errors render their exact message and
/// everything else is wrapped as "Error: <message>".
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self.0.downcast_ref::<RollcallError>() {
            Some(e @ (RollcallError::MissingData | RollcallError::InvalidDataFormat)) => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            Some(e @ (RollcallError::DateNotFound(_) | RollcallError::StudentNotFound(_))) => {
                (StatusCode::NOT_FOUND, e.to_string())
            }
            Some(e @ RollcallError::Json(_)) => {
                (StatusCode::BAD_REQUEST, format!("Error: {e}"))
            }
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error: {}", self.0),
            ),
        };
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

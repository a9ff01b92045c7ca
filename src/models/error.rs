use axum::{Json, extract::rejection::JsonRejection, http::StatusCode};
use serde::{Deserialize, Serialize};

/// JSON body of every failed request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable reason
    pub error: String,
    /// Machine-readable code for programmatic handling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn api_error(status: StatusCode, error: impl Into<String>, code: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: Some(code.to_string()),
        }),
    )
}

pub fn bad_request(error: impl Into<String>) -> ApiError {
    api_error(StatusCode::BAD_REQUEST, error, "VALIDATION_ERROR")
}

pub fn not_found(error: impl Into<String>) -> ApiError {
    api_error(StatusCode::NOT_FOUND, error, "NOT_FOUND")
}

pub fn database_error(err: impl std::fmt::Display) -> ApiError {
    api_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Database error: {}", err),
        "DATABASE_ERROR",
    )
}

/// Unwraps a JSON body, turning malformed input into a 400 JSON error.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| bad_request(format!("Invalid request body: {}", rejection.body_text())))
}

/// Builds the "missing field(s)" message for required request fields.
///
/// Returns `None` when every field is present.
pub fn missing_fields(fields: &[(&str, bool)]) -> Option<String> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| *name)
        .collect();

    match missing.len() {
        0 => None,
        1 => Some(format!("Missing required field: {}", missing[0])),
        _ => Some(format!("Missing required fields: {}", missing.join(", "))),
    }
}

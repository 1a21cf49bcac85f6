//! SCIM response error classification
//!
//! Turns a non-2xx response into one of the connector's error kinds. The
//! caller has already read the body in full, so the connection is back in the
//! pool whichever branch is taken here.

use crate::error::{ConnectorError, ConnectorResult};
use reqwest::StatusCode;
use serde::Deserialize;

/// `scimType` reported with 409 when a unique attribute collides
pub const SCIM_TYPE_UNIQUENESS: &str = "uniqueness";

/// `scimType` reported with 400 when a value is rejected
pub const SCIM_TYPE_INVALID_VALUE: &str = "invalidValue";

/// SCIM error response body
#[derive(Debug, Deserialize)]
struct ScimErrorBody {
    detail: String,
    #[serde(rename = "scimType")]
    scim_type: String,
}

/// Check a response status, classifying failures.
pub fn check_response(status: StatusCode, body: &str) -> ConnectorResult<()> {
    if status.is_success() {
        return Ok(());
    }

    match status {
        StatusCode::CONFLICT => Err(classify_scim_error(
            body,
            SCIM_TYPE_UNIQUENESS,
            ConnectorError::AlreadyExists,
        )),
        StatusCode::BAD_REQUEST => Err(classify_scim_error(
            body,
            SCIM_TYPE_INVALID_VALUE,
            ConnectorError::InvalidValue,
        )),
        _ => Err(generic_response_error(status, body)),
    }
}

/// Map a SCIM error body carrying `expected` to `make(detail)`.
fn classify_scim_error(
    body: &str,
    expected: &str,
    make: fn(String) -> ConnectorError,
) -> ConnectorError {
    let parsed: ScimErrorBody = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(e) => {
            let message = format!("{} when parsing result: {}", e, body);
            return ConnectorError::transport_with(message, e);
        }
    };

    if parsed.scim_type == expected {
        make(parsed.detail)
    } else {
        ConnectorError::transport(format!("Error when processing response: {}", body))
    }
}

/// Status handling with no resource-specific semantics.
fn generic_response_error(status: StatusCode, body: &str) -> ConnectorError {
    let message = format!(
        "HTTP error {} {} : {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or(""),
        body
    );

    match status {
        StatusCode::NOT_FOUND | StatusCode::GONE => ConnectorError::UnknownUid(message),
        _ => ConnectorError::transport(message),
    }
}

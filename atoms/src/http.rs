//! Response helpers shared by every atom's HTTP layer.

use lambda_http::{http::StatusCode, Body, Error, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{AtomError, AtomResult};

/// JSON response with the given status.
pub fn json_response<T: Serialize>(status: StatusCode, value: &T) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(serde_json::to_string(value)?.into())
        .map_err(Box::new)?)
}

/// Empty response, used for 204s.
pub fn empty_response(status: StatusCode) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .body(Body::Empty)
        .map_err(Box::new)?)
}

/// Converts an atom error into its JSON error payload.
pub fn error_response(err: &AtomError) -> Result<Response<Body>, Error> {
    match err {
        AtomError::Persistence(_) | AtomError::Storage(_) => {
            tracing::error!("❌ request failed: {}", err);
        }
        _ => tracing::warn!("request rejected: {}", err),
    }

    json_response(
        err.status_code(),
        &serde_json::json!({
            "error": err.kind(),
            "message": err.public_message(),
        }),
    )
}

/// Answers `ok` with the serialized value or the matching error payload.
pub fn respond<T: Serialize>(result: AtomResult<T>, ok: StatusCode) -> Result<Response<Body>, Error> {
    match result {
        Ok(value) => json_response(ok, &value),
        Err(e) => error_response(&e),
    }
}

/// Parses a JSON request body. An empty body is treated as `{}`.
pub fn parse_body<T: DeserializeOwned>(body: &[u8]) -> AtomResult<T> {
    let body = if body.iter().all(u8::is_ascii_whitespace) {
        b"{}".as_slice()
    } else {
        body
    };
    serde_json::from_slice(body).map_err(|e| AtomError::validation(format!("Invalid request body: {e}")))
}

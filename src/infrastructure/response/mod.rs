use crate::domain::error::{AppError, Result};
use crate::domain::platform::Platform;
use crate::domain::workflow::IntegrationOutcome;
use serde_json::Value;

pub const GENERIC_GENERATION_ERROR: &str = "An unexpected error occurred.";

pub fn generic_integration_error(platform: Platform) -> String {
    format!(
        "Failed to send test cases to {}.",
        platform.display_name()
    )
}

/// Pulls a human-readable message out of an error body.
///
/// Looks at `error` first, then `detail`; string values are returned verbatim,
/// structured values as compact JSON. Blank values count as absent.
pub fn extract_error_message(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body.trim()).ok()?;
    extract_error_field(&json)
}

pub fn extract_error_field(json: &Value) -> Option<String> {
    ["error", "detail"].iter().find_map(|field| match json.get(field)? {
        Value::Null => None,
        Value::String(text) if text.trim().is_empty() => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    })
}

/// Reduces a platform's success body to the uniform outcome.
///
/// The created identifiers are read from the field named in the platform's
/// response shape. A body without `message` or without that field is a
/// protocol error; its `error`/`detail` text is used when present.
pub fn normalize_integration_response(platform: Platform, body: &Value) -> Result<IntegrationOutcome> {
    let shape = platform.response_shape();
    let protocol_error = || {
        AppError::Protocol(
            extract_error_field(body).unwrap_or_else(|| generic_integration_error(platform)),
        )
    };

    let server_message = body
        .get("message")
        .and_then(Value::as_str)
        .ok_or_else(protocol_error)?
        .to_string();

    let identifiers = body
        .get(shape.field)
        .and_then(Value::as_array)
        .ok_or_else(protocol_error)?
        .iter()
        .map(|item| match item {
            Value::String(id) => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        })
        .collect::<Option<Vec<String>>>()
        .ok_or_else(protocol_error)?;

    let message = format!("{} - {}", server_message, shape.render(&identifiers));

    Ok(IntegrationOutcome {
        platform,
        server_message,
        identifiers,
        message,
    })
}

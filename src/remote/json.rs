use reqwest::{
    Response,
    header::{CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde::de::DeserializeOwned;
use serde_json::Deserializer;

use crate::errors::{HookError, HookResult};

pub const MAX_BODY_SIZE_BYTES: usize = 64 * 1024; // 64 KiB upper bound for response bodies

/// Reads a success response and decodes its JSON body strictly.
///
/// The body is read chunk by chunk and abandoned as soon as it passes
/// [`MAX_BODY_SIZE_BYTES`], whether or not the server declared its length.
pub async fn read_json<T>(mut response: Response) -> HookResult<T>
where
    T: DeserializeOwned,
{
    validate_content_type(response.headers())?;

    if let Some(length) = response.content_length()
        && length > MAX_BODY_SIZE_BYTES as u64
    {
        return Err(too_large(length as usize));
    }

    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await.map_err(|err| {
        HookError::NetworkFailure(format!("failed to read response body: {err}"))
    })? {
        let received = body.len() + chunk.len();
        if received > MAX_BODY_SIZE_BYTES {
            return Err(too_large(received));
        }
        body.extend_from_slice(&chunk);
    }

    decode_json(&body)
}

/// Decodes a JSON document, reporting where in the document parsing failed.
pub fn decode_json<T>(bytes: &[u8]) -> HookResult<T>
where
    T: DeserializeOwned,
{
    let mut deserializer = Deserializer::from_slice(bytes);
    let result = serde_path_to_error::deserialize(&mut deserializer).map_err(parsing_error)?;

    deserializer.end().map_err(|err| {
        HookError::MalformedResponse(format!("unexpected trailing data: {err}"))
    })?;

    Ok(result)
}

fn parsing_error(err: serde_path_to_error::Error<serde_json::Error>) -> HookError {
    let path = err.path().to_string();
    let error = err.into_inner();
    let message = if path.is_empty() || path == "." {
        format!("failed to parse JSON body: {error}")
    } else {
        format!("failed to parse JSON body at {path}: {error}")
    };

    HookError::MalformedResponse(message)
}

fn too_large(length: usize) -> HookError {
    HookError::MalformedResponse(format!(
        "response body of at least {length} bytes exceeds the {MAX_BODY_SIZE_BYTES} byte limit"
    ))
}

fn validate_content_type(headers: &HeaderMap) -> HookResult<()> {
    let value = headers.get(CONTENT_TYPE);

    if let Some(value) = value
        && let Ok(value) = value.to_str()
        && is_json_media_type(value)
    {
        return Ok(());
    }

    Err(invalid_content_type(value))
}

fn is_json_media_type(value: &str) -> bool {
    let essence = value.split(';').next().unwrap_or_default().trim();
    essence.eq_ignore_ascii_case("application/json") || essence.ends_with("+json")
}

fn invalid_content_type(value: Option<&HeaderValue>) -> HookError {
    let received = value
        .and_then(|val| val.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| "missing".to_string());
    HookError::MalformedResponse(format!(
        "expected application/json response, received {received}"
    ))
}

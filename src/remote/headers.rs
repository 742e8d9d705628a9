use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};

use crate::errors::{HookError, HookResult};

const ACCEPT_JSON: &str = "application/json";
const REQUESTED_WITH: &str = "XMLHttpRequest";
const CSRF_HEADER: &str = "x-csrftoken";

/// Headers every request from a page widget carries.
pub fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_JSON));
    headers.insert(
        HeaderName::from_static("x-requested-with"),
        HeaderValue::from_static(REQUESTED_WITH),
    );
    headers
}

/// Header pair carrying the page's CSRF token on unsafe requests.
pub fn csrf_header(token: &str) -> HookResult<(HeaderName, HeaderValue)> {
    let mut value = HeaderValue::from_str(token)
        .map_err(|err| HookError::Config(format!("CSRF token is not a valid header value: {err}")))?;
    value.set_sensitive(true);
    Ok((HeaderName::from_static(CSRF_HEADER), value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_headers() {
        let headers = default_headers();
        assert_eq!(headers.get(ACCEPT).unwrap(), "application/json");
        assert_eq!(headers.get("x-requested-with").unwrap(), "XMLHttpRequest");
    }

    #[test]
    fn test_csrf_header_is_sensitive() {
        let (name, value) = csrf_header("tok3n").unwrap();
        assert_eq!(name.as_str(), "x-csrftoken");
        assert!(value.is_sensitive());
    }

    #[test]
    fn test_csrf_header_rejects_newlines() {
        assert!(matches!(csrf_header("bad\ntoken"), Err(HookError::Config(_))));
    }
}

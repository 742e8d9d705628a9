use std::str::FromStr;
use std::time::Duration;

use dotenvy::dotenv;
use url::Url;

use crate::errors::{HookError, HookResult};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_VALIDATION_PATH: &str = "validate-category-name/";
const DEFAULT_CATEGORIES_PATH: &str = "load-categories/";
const DEFAULT_VALIDATION_PARAM: &str = "name";
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_ALERT_DISMISS_MS: u64 = 5_000;

/// How the candidate value reaches the validation endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Transport {
    /// `GET <url>?<param>=<value>`
    #[default]
    Get,
    /// `POST <url>` with a JSON object body `{"<param>": <value>}`
    Post,
}

impl FromStr for Transport {
    type Err = HookError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "get" => Ok(Transport::Get),
            "post" => Ok(Transport::Post),
            other => Err(HookError::Config(format!(
                "transport must be get or post, got {other:?}"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HooksConfig {
    pub validation_url: Url,
    pub categories_url: Url,
    pub transport: Transport,
    pub validation_param: String,
    pub request_timeout: Duration,
    pub debounce: Duration,
    pub alert_dismiss_after: Duration,
    pub csrf_token: Option<String>,
}

impl HooksConfig {
    /// Reads `TRACKER_*` variables, loading `.env` first when present.
    #[tracing::instrument(name = "hooks_config_load")]
    pub fn from_env() -> HookResult<Self> {
        dotenv().ok();
        let config = Self::from_lookup(|key| std::env::var(key).ok())?;

        tracing::info!(
            validation_url = %config.validation_url,
            categories_url = %config.categories_url,
            transport = ?config.transport,
            request_timeout_ms = config.request_timeout.as_millis() as u64,
            debounce_ms = config.debounce.as_millis() as u64,
            csrf = config.csrf_token.is_some(),
            "Hooks configuration loaded"
        );

        Ok(config)
    }

    /// Builds a configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> HookResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let base = get("TRACKER_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base = with_trailing_slash(Url::parse(base.trim())?);

        let validation_url = match get("TRACKER_VALIDATION_URL") {
            Some(raw) => Url::parse(raw.trim())?,
            None => base.join(DEFAULT_VALIDATION_PATH)?,
        };
        let categories_url = match get("TRACKER_CATEGORIES_URL") {
            Some(raw) => Url::parse(raw.trim())?,
            None => base.join(DEFAULT_CATEGORIES_PATH)?,
        };

        let transport = match get("TRACKER_VALIDATION_TRANSPORT") {
            Some(raw) => raw.parse()?,
            None => Transport::default(),
        };

        let validation_param = get("TRACKER_VALIDATION_PARAM")
            .map(|raw| raw.trim().to_string())
            .unwrap_or_else(|| DEFAULT_VALIDATION_PARAM.to_string());

        let request_timeout = millis(
            "TRACKER_REQUEST_TIMEOUT_MS",
            get("TRACKER_REQUEST_TIMEOUT_MS"),
            DEFAULT_REQUEST_TIMEOUT_MS,
        )?;
        if request_timeout.is_zero() {
            return Err(HookError::Config(
                "TRACKER_REQUEST_TIMEOUT_MS must be greater than zero".to_string(),
            ));
        }

        let debounce = millis("TRACKER_DEBOUNCE_MS", get("TRACKER_DEBOUNCE_MS"), 0)?;
        let alert_dismiss_after = millis(
            "TRACKER_ALERT_DISMISS_MS",
            get("TRACKER_ALERT_DISMISS_MS"),
            DEFAULT_ALERT_DISMISS_MS,
        )?;

        Ok(Self {
            validation_url,
            categories_url,
            transport,
            validation_param,
            request_timeout,
            debounce,
            alert_dismiss_after,
            csrf_token: get("TRACKER_CSRF_TOKEN").map(|raw| raw.trim().to_string()),
        })
    }
}

impl Default for HooksConfig {
    fn default() -> Self {
        let base = Url::parse(DEFAULT_BASE_URL).expect("default base url must parse");
        Self {
            validation_url: base
                .join(DEFAULT_VALIDATION_PATH)
                .expect("default validation path must join"),
            categories_url: base
                .join(DEFAULT_CATEGORIES_PATH)
                .expect("default categories path must join"),
            transport: Transport::default(),
            validation_param: DEFAULT_VALIDATION_PARAM.to_string(),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            debounce: Duration::ZERO,
            alert_dismiss_after: Duration::from_millis(DEFAULT_ALERT_DISMISS_MS),
            csrf_token: None,
        }
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn millis(key: &str, raw: Option<String>, default: u64) -> HookResult<Duration> {
    let Some(raw) = raw else {
        return Ok(Duration::from_millis(default));
    };

    raw.trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|err| HookError::Config(format!("{key} must be a whole number of milliseconds: {err}")))
}

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::{Map, Value};
use url::Url;

use super::headers::{csrf_header, default_headers};
use super::json::read_json;
use super::{CategorySource, NameValidator};
use crate::config::{HooksConfig, Transport};
use crate::errors::{HookError, HookResult};
use crate::logging::SanitizedValue;
use crate::models::{CategoryOption, TransactionType, ValidationRequest, ValidationResult};

/// Shared HTTP client for one page, configured once from [`HooksConfig`].
#[derive(Debug, Clone)]
pub struct TrackerClient {
    http: Client,
    config: Arc<HooksConfig>,
}

impl TrackerClient {
    #[tracing::instrument(name = "tracker_client_setup", skip(config))]
    pub fn new(config: HooksConfig) -> HookResult<Self> {
        if let Some(token) = &config.csrf_token {
            csrf_header(token)?;
        }

        let http = Client::builder()
            .default_headers(default_headers())
            .timeout(config.request_timeout)
            .build()
            .map_err(|err| HookError::Config(format!("failed to build HTTP client: {err}")))?;

        tracing::debug!(
            timeout_ms = config.request_timeout.as_millis() as u64,
            "Tracker HTTP client ready"
        );

        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &HooksConfig {
        &self.config
    }

    /// Validator for the category-name endpoint using the configured transport.
    pub fn validator(&self) -> HttpValidator {
        HttpValidator {
            http: self.http.clone(),
            url: self.config.validation_url.clone(),
            transport: self.config.transport,
            param: self.config.validation_param.clone(),
            context: Vec::new(),
            csrf_token: self.config.csrf_token.clone(),
        }
    }

    pub fn category_source(&self) -> HttpCategorySource {
        HttpCategorySource {
            http: self.http.clone(),
            url: self.config.categories_url.clone(),
        }
    }
}

/// Checks candidate values against the validation endpoint.
#[derive(Debug, Clone)]
pub struct HttpValidator {
    http: Client,
    url: Url,
    transport: Transport,
    param: String,
    context: Vec<(String, String)>,
    csrf_token: Option<String>,
}

impl HttpValidator {
    /// Adds a page-supplied pair sent alongside every value, e.g. `type=INC`.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.push((key.into(), value.into()));
        self
    }

    fn build_request(&self, value: &str) -> HookResult<RequestBuilder> {
        match self.transport {
            Transport::Get => {
                let mut query = self.context.clone();
                query.push((self.param.clone(), value.to_string()));
                Ok(self.http.get(self.url.clone()).query(&query))
            }
            Transport::Post => {
                let mut body = Map::new();
                for (key, context_value) in &self.context {
                    body.insert(key.clone(), Value::String(context_value.clone()));
                }
                body.insert(self.param.clone(), Value::String(value.to_string()));

                let mut builder = self.http.post(self.url.clone()).json(&Value::Object(body));
                if let Some(token) = &self.csrf_token {
                    let (name, header) = csrf_header(token)?;
                    builder = builder.header(name, header);
                }
                Ok(builder)
            }
        }
    }
}

#[async_trait]
impl NameValidator for HttpValidator {
    #[tracing::instrument(
        name = "remote_validation",
        skip(self, request),
        fields(transport = ?self.transport, value = %SanitizedValue::new(&request.field_value))
    )]
    async fn check(&self, request: &ValidationRequest) -> HookResult<ValidationResult> {
        let response = self
            .build_request(&request.field_value)?
            .send()
            .await
            .map_err(HookError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(HookError::ServerError { status });
        }

        let result: ValidationResult = read_json(response).await?;
        tracing::debug!(exists = result.exists, "Validation endpoint answered");
        Ok(result)
    }
}

/// Loads the category list for a transaction type.
#[derive(Debug, Clone)]
pub struct HttpCategorySource {
    http: Client,
    url: Url,
}

#[async_trait]
impl CategorySource for HttpCategorySource {
    #[tracing::instrument(name = "load_categories", skip(self), fields(kind = %kind))]
    async fn categories(&self, kind: TransactionType) -> HookResult<Vec<CategoryOption>> {
        let response = self
            .http
            .get(self.url.clone())
            .query(&[("type", kind.code())])
            .send()
            .await
            .map_err(HookError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(HookError::ServerError { status });
        }

        let options: Vec<CategoryOption> = read_json(response).await?;
        tracing::debug!(count = options.len(), "Category endpoint answered");
        Ok(options)
    }
}

//! Transport executor
//!
//! Performs single request/response round trips in either JSON or raw-binary
//! mode, and wraps them in the retry loop for callers.

use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::Client as ReqwestClient;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::builder::{ApiRequest, PreparedRequest, RequestBuilder};
use crate::http::context::CallOptions;
use crate::http::error::{ApiError, ErrorCode, RequestError};
use crate::http::headers::{self, header_flag, header_str, header_i64};
use crate::http::retry::Retrier;
use crate::logging::SharedLogger;

/// Body of a successful JSON exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonResponse {
    pub body: Vec<u8>,
    pub status: u16,
    pub request_id: String,
}

/// Binary payload plus the metadata carried in response headers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawResponse {
    pub data: Vec<u8>,
    pub content_type: String,
    pub version: String,
    pub content_violation: bool,
    pub request_id: String,
    pub credits_used: i64,
    pub credits_remaining: i64,
}

/// HTTP transport with retry for API communication
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: ReqwestClient,
    request_builder: RequestBuilder,
    retrier: Retrier,
    /// Present only when debug output is enabled
    logger: Option<SharedLogger>,
}

impl HttpTransport {
    /// Create a transport from client configuration
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let builder = ReqwestClient::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout);
        let client = config
            .proxy
            .apply(builder)?
            .build()
            .map_err(|e| Error::Configuration {
                message: "failed to create HTTP client".to_string(),
                source: Some(e.into()),
            })?;

        let logger = config
            .debug
            .then(|| config.logger.clone().unwrap_or_default());

        Ok(Self {
            client,
            request_builder: RequestBuilder::new(
                config.base_url.clone(),
                config.api_key.clone(),
                config.user_agent.clone(),
            ),
            retrier: Retrier::new(config.retry_policy()),
            logger,
        })
    }

    pub fn request_builder(&self) -> &RequestBuilder {
        &self.request_builder
    }

    pub fn retrier(&self) -> &Retrier {
        &self.retrier
    }

    /// Send a request expecting a JSON response, retrying transient failures
    pub async fn send<B: Serialize>(
        &self,
        request: &ApiRequest<B>,
        options: &CallOptions,
    ) -> Result<JsonResponse> {
        let prepared = self.request_builder.build(request)?;
        self.retrier
            .run(options, |_| self.execute(&prepared))
            .await
    }

    /// Send a request expecting a binary response, retrying transient failures
    pub async fn send_raw<B: Serialize>(
        &self,
        request: &ApiRequest<B>,
        options: &CallOptions,
    ) -> Result<RawResponse> {
        let prepared = self.request_builder.build(request)?;
        self.retrier
            .run(options, |_| self.execute_raw(&prepared))
            .await
    }

    /// One JSON round trip. Statuses of 400 and above are classified.
    pub async fn execute(&self, prepared: &PreparedRequest) -> Result<JsonResponse> {
        self.log(|| format!("Request: {} {}", prepared.method(), prepared.url()));

        let response = self
            .client
            .execute(prepared.to_request())
            .await
            .map_err(|e| RequestError::new("http", e))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| RequestError::new("read response", e))?
            .to_vec();

        self.log(|| format!("Response: status={}, size={}", status.as_u16(), body.len()));
        tracing::trace!(status = status.as_u16(), size = body.len(), "JSON response received");

        if status.as_u16() >= 400 {
            return Err(ApiError::from_parts(status, &headers, &body).into());
        }

        Ok(JsonResponse {
            body,
            status: status.as_u16(),
            request_id: header_str(&headers, headers::REQUEST_ID).to_string(),
        })
    }

    /// One binary round trip.
    ///
    /// An error-code header marks the exchange as failed even on a 2xx
    /// status. Metadata headers are optional and default to empty or zero.
    pub async fn execute_raw(&self, prepared: &PreparedRequest) -> Result<RawResponse> {
        self.log(|| format!("Request (raw): {} {}", prepared.method(), prepared.url()));

        let response = self
            .client
            .execute(prepared.to_request())
            .await
            .map_err(|e| RequestError::new("http", e))?;

        let status = response.status();
        let headers = response.headers().clone();

        if is_raw_failure(status.as_u16(), &headers) {
            // The classification is what matters here; a body that cannot be
            // read just degrades the message.
            let body = response.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
            self.log(|| format!("Response (raw): status={}, error", status.as_u16()));
            let mut error = ApiError::from_parts(status, &headers, &body);
            if error.code.is_none() {
                let code = header_str(&headers, headers::ERROR_CODE);
                error.code = (!code.is_empty()).then(|| ErrorCode::from(code));
            }
            return Err(error.into());
        }

        let data = response
            .bytes()
            .await
            .map_err(|e| RequestError::new("read response", e))?
            .to_vec();

        self.log(|| format!("Response (raw): status={}, size={}", status.as_u16(), data.len()));
        tracing::trace!(status = status.as_u16(), size = data.len(), "Raw response received");

        Ok(raw_response(data, &headers))
    }

    fn log(&self, message: impl FnOnce() -> String) {
        if let Some(logger) = &self.logger {
            logger.log(&message());
        }
    }
}

fn is_raw_failure(status: u16, headers: &HeaderMap) -> bool {
    !header_str(headers, headers::ERROR_CODE).is_empty() || status >= 400
}

fn raw_response(data: Vec<u8>, headers: &HeaderMap) -> RawResponse {
    RawResponse {
        data,
        content_type: header_str(headers, CONTENT_TYPE.as_str()).to_string(),
        version: header_str(headers, headers::VERSION).to_string(),
        content_violation: header_flag(headers, headers::CONTENT_VIOLATION),
        request_id: header_str(headers, headers::REQUEST_ID).to_string(),
        credits_used: header_i64(headers, headers::CREDITS_USED),
        credits_remaining: header_i64(headers, headers::CREDITS_REMAINING),
    }
}

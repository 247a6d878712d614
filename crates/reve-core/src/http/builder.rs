//! HTTP request builder for API requests
//!
//! Turns a logical [`ApiRequest`] into a [`PreparedRequest`]: full URL,
//! standard headers and the serialized body, kept so every retry attempt
//! replays the same bytes.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::Method;
use url::Url;
use serde::Serialize;
use std::fmt;

use crate::error::Result;
use crate::http::error::RequestError;

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Logical request descriptor
#[derive(Debug, Clone)]
pub struct ApiRequest<B = serde_json::Value> {
    pub method: Method,
    pub path: String,
    pub body: Option<B>,
    /// Accept header override; JSON when unset
    pub accept: Option<String>,
    /// Tracing token sent as the `breadcrumb` query parameter
    pub breadcrumb: Option<String>,
}

impl<B> ApiRequest<B> {
    /// A POST to `path` with no body
    pub fn post(path: impl Into<String>) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            body: None,
            accept: None,
            breadcrumb: None,
        }
    }

    pub fn with_body(mut self, body: B) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = Some(accept.into());
        self
    }

    pub fn with_breadcrumb(mut self, breadcrumb: Option<&str>) -> Self {
        self.breadcrumb = breadcrumb.filter(|b| !b.is_empty()).map(str::to_string);
        self
    }
}

/// A fully-formed request that can be sent any number of times
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
}

impl PreparedRequest {
    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The serialized body, identical for every attempt
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// A fresh `reqwest::Request` carrying a copy of the captured body
    pub fn to_request(&self) -> reqwest::Request {
        let mut request = reqwest::Request::new(self.method.clone(), self.url.clone());
        *request.headers_mut() = self.headers.clone();
        if let Some(body) = &self.body {
            *request.body_mut() = Some(body.clone().into());
        }
        request
    }
}

/// Builds requests against one base URL with one credential
#[derive(Clone)]
pub struct RequestBuilder {
    base_url: String,
    api_key: String,
    user_agent: String,
}

impl RequestBuilder {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            user_agent: user_agent.into(),
        }
    }

    /// Build a request without touching the network.
    ///
    /// Serialization failures surface as a `marshal` request error; a bad
    /// URL or header value as `create request`.
    pub fn build<B: Serialize>(&self, request: &ApiRequest<B>) -> Result<PreparedRequest> {
        let body = request
            .body
            .as_ref()
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|e| RequestError::new("marshal", e))?;

        let url = self.build_url(request)?;

        let mut headers = HeaderMap::new();
        let mut authorization = header_value(&format!("Bearer {}", self.api_key))?;
        authorization.set_sensitive(true);
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        headers.insert(USER_AGENT, header_value(&self.user_agent)?);
        let accept = request
            .accept
            .as_deref()
            .filter(|accept| !accept.is_empty())
            .unwrap_or(JSON_CONTENT_TYPE);
        headers.insert(ACCEPT, header_value(accept)?);

        Ok(PreparedRequest {
            method: request.method.clone(),
            url,
            headers,
            body,
        })
    }

    /// Base URL and path are concatenated, so a base path prefix survives.
    fn build_url<B>(&self, request: &ApiRequest<B>) -> Result<Url> {
        let raw = format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            request.path
        );
        let mut url = Url::parse(&raw).map_err(|e| RequestError::new("create request", e))?;

        if let Some(breadcrumb) = &request.breadcrumb {
            url.query_pairs_mut().append_pair("breadcrumb", breadcrumb);
        }

        Ok(url)
    }
}

impl fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| RequestError::new("create request", e).into())
}

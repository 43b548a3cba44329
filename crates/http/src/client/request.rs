//! Outbound request descriptions and verbatim responses

use super::ClientError;
use crate::types::Envelope;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Whether a request has already been through session renewal
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Attempt {
    #[default]
    NotRetried,
    Retried,
}

/// A transport-independent description of one API call
///
/// The bearer header is not stored here; it is attached from the session store
/// each time the request goes out.
#[derive(Clone, Debug)]
pub struct OutboundRequest {
    method: Method,
    path: String,
    headers: HeaderMap,
    query: Vec<(String, String)>,
    body: Option<Bytes>,
    attempt: Attempt,
}

impl OutboundRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            query: Vec::new(),
            body: None,
            attempt: Attempt::NotRetried,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Serialize `body` as the JSON payload
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ClientError> {
        self.body = Some(Bytes::from(serde_json::to_vec(body)?));
        self.headers.insert(
            reqwest::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        Ok(self)
    }

    /// Use an opaque payload
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Start from a given attempt state
    #[must_use]
    pub fn with_attempt(mut self, attempt: Attempt) -> Self {
        self.attempt = attempt;
        self
    }

    /// Move to [`Attempt::Retried`]; returns false if the request was already retried
    pub fn mark_retried(&mut self) -> bool {
        match self.attempt {
            Attempt::NotRetried => {
                self.attempt = Attempt::Retried;
                true
            }
            Attempt::Retried => false,
        }
    }

    pub const fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    pub const fn body_bytes(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    pub const fn attempt(&self) -> Attempt {
        self.attempt
    }
}

/// A successful server response, kept verbatim
#[derive(Clone, Debug)]
pub struct ApiResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl ApiResponse {
    pub const fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub const fn status(&self) -> StatusCode {
        self.status
    }

    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub const fn bytes(&self) -> &Bytes {
        &self.body
    }

    /// Body as UTF-8 text (lossy)
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the whole body
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Decode the `result` field of a `{ "result": ... }` envelope
    pub fn result<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        Ok(self.json::<Envelope<T>>()?.result)
    }
}

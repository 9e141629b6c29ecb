//! Minimal JSON-over-HTTP plumbing shared by the API clients.
//!
//! Clients build an [`ApiRequest`], hand it to an [`HttpTransport`] and
//! interpret the [`ApiResponse`]. The browser implementation is
//! [`FetchTransport`]; tests plug in their own transport.

use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder};
use thiserror::Error;

use crate::system::auth::storage;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Failed to send request: {0}")]
    Transport(String),

    /// Non-2xx response. The message is already human readable.
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("Failed to serialize request: {0}")]
    Serialize(String),

    #[error("Failed to parse response: {0}")]
    Decode(String),
}

impl ApiError {
    #[cfg(test)]
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    pub fn json<B: serde::Serialize>(mut self, body: &B) -> Result<Self, ApiError> {
        let text =
            serde_json::to_string(body).map_err(|e| ApiError::Serialize(e.to_string()))?;
        self.body = Some(text);
        Ok(self)
    }

    #[cfg(test)]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_str(&self.body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Sends one request and returns the raw response.
///
/// Implementations must not retry; a transport failure is reported as
/// [`ApiError::Transport`].
#[async_trait(?Send)]
pub trait HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// Browser `fetch` transport.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

#[async_trait(?Send)]
impl HttpTransport for FetchTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let mut builder: RequestBuilder = match request.method {
            Method::Get => Request::get(&request.url),
            Method::Post => Request::post(&request.url),
            Method::Put => Request::put(&request.url),
            Method::Delete => Request::delete(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let prepared = match request.body {
            Some(body) => builder.body(body),
            None => builder.build(),
        }
        .map_err(|e| ApiError::Transport(e.to_string()))?;

        let response = prepared
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        let status_text = response.status_text();
        let body = read_body(response.text().await)?;

        Ok(ApiResponse {
            status,
            status_text,
            body,
        })
    }
}

/// A body that cannot be read fails the request like a dropped connection.
fn read_body<E: std::fmt::Display>(result: Result<String, E>) -> Result<String, ApiError> {
    result.map_err(|e| ApiError::Transport(e.to_string()))
}

/// Where the bearer token comes from. Read on every request.
pub trait TokenSource {
    fn token(&self) -> Option<String>;
}

/// Reads the token from localStorage at call time.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageToken;

impl TokenSource for LocalStorageToken {
    fn token(&self) -> Option<String> {
        storage::get_token()
    }
}

/// Fixed token, used by tests and by callers that already hold a session.
#[derive(Debug, Clone, Default)]
pub struct StaticToken(pub Option<String>);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }
}

impl TokenSource for StaticToken {
    fn token(&self) -> Option<String> {
        self.0.clone()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Records every request and answers from a queue.
    #[derive(Default)]
    pub struct RecordingTransport {
        pub sent: RefCell<Vec<ApiRequest>>,
        pub replies: RefCell<VecDeque<Result<ApiResponse, ApiError>>>,
    }

    impl RecordingTransport {
        pub fn replying(status: u16, status_text: &str, body: &str) -> Self {
            let transport = Self::default();
            transport.push(status, status_text, body);
            transport
        }

        pub fn failing(error: ApiError) -> Self {
            let transport = Self::default();
            transport.replies.borrow_mut().push_back(Err(error));
            transport
        }

        pub fn push(&self, status: u16, status_text: &str, body: &str) {
            self.replies.borrow_mut().push_back(Ok(ApiResponse {
                status,
                status_text: status_text.to_string(),
                body: body.to_string(),
            }));
        }

        pub fn sent(&self) -> Vec<ApiRequest> {
            self.sent.borrow().clone()
        }
    }

    #[async_trait(?Send)]
    impl<'a> HttpTransport for &'a RecordingTransport {
        async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
            self.sent.borrow_mut().push(request);
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::Transport("no reply queued".to_string())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreadable_body_is_transport_error() {
        let failed: Result<String, &str> = Err("body stream already read");
        assert_eq!(
            read_body(failed),
            Err(ApiError::Transport("body stream already read".to_string()))
        );

        let empty: Result<String, &str> = Ok(String::new());
        assert_eq!(read_body(empty), Ok(String::new()));
    }
}

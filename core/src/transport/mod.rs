//! Transport abstraction and the reqwest implementation
//!
//! The records API never talks HTTP directly; it hands an [`ApiRequest`] to a
//! [`Transport`] and returns whatever body comes back.

pub mod http;
pub mod query;

pub use http::HttpTransport;
pub use query::{QueryParams, QueryValue};

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

/// Trait for anything that can carry an API request to the server
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and return the decoded JSON body
    ///
    /// An empty body is returned as `Value::Null`.
    async fn send(&self, request: ApiRequest) -> Result<Value>;
}

/// HTTP verbs used by the records API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Get the verb as an uppercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A single request, relative to the transport's base URL
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP verb
    pub method: Method,
    /// Path starting with `/`
    pub path: String,
    /// Query parameters, forwarded as given
    pub query: QueryParams,
    /// JSON body, if any
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Create a request with no query and no body
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: QueryParams::new(),
            body: None,
        }
    }

    /// Shorthand for a GET request
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    /// Shorthand for a POST request
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    /// Shorthand for a PUT request
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    /// Shorthand for a DELETE request
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Attach query parameters
    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    /// Attach a JSON body
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_builders() {
        let request = ApiRequest::put("/records/7").with_body(json!({ "score": 9 }));
        assert_eq!(request.method, Method::Put);
        assert_eq!(request.path, "/records/7");
        assert!(request.query.is_empty());
        assert_eq!(request.body, Some(json!({ "score": 9 })));
    }

    #[test]
    fn test_method_display() {
        assert_eq!(Method::Delete.to_string(), "DELETE");
        assert_eq!(reqwest::Method::from(Method::Post), reqwest::Method::POST);
    }
}

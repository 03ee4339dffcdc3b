//! Client for the FILxCONNECT backend REST API.
//!
//! Every backend call goes through [`Gateway`], which joins a relative path
//! onto the configured origin, sends an optional JSON body and parses the
//! JSON response. [`BackendApi`] layers one typed method per resource on top.

mod endpoints;

pub use endpoints::{BackendApi, ReportDecision};

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;
use crate::constants::USER_AGENT;

/// Failure of a single backend call.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{method} {path} returned {status}")]
    Status {
        method: Method,
        path: String,
        status: StatusCode,
        body: String,
    },
    #[error("cannot encode request body for {path}: {source}")]
    Encode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("unexpected response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Issues HTTP calls against the single backend origin.
#[derive(Clone)]
pub struct Gateway {
    http: reqwest::Client,
    base_url: String,
}

impl Gateway {
    /// Create a gateway from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self::with_client(http, &config.backend_url))
    }

    /// Create a gateway around an existing client.
    #[must_use]
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Absolute URL for a path relative to the backend origin.
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send a request without a body and return the parsed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    pub async fn send(&self, path: &str, method: Method) -> Result<Value, ApiError> {
        self.request(path, method, None).await
    }

    /// Send a request with a JSON body and return the parsed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be encoded, on transport failure
    /// or on a non-success status.
    pub async fn send_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        method: Method,
        body: &B,
    ) -> Result<Value, ApiError> {
        let body = serde_json::to_value(body).map_err(|source| ApiError::Encode {
            path: path.to_string(),
            source,
        })?;
        self.request(path, method, Some(body)).await
    }

    /// `GET` a path and decode the response into `T`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status or a
    /// response that does not match `T`.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let value = self.send(path, Method::GET).await?;
        decode(path, value)
    }

    /// Perform the call.
    ///
    /// An empty body parses as `null`. A successful response whose body is
    /// not JSON (some status transitions answer with plain text) comes back
    /// as a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    pub async fn request(
        &self,
        path: &str,
        method: Method,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        let url = self.url_for(path);
        debug!(method = %method, path = %path, "Backend request");

        let mut request = self.http.request(method.clone(), &url);
        if let Some(body) = &body {
            request = request.json(body);
        }

        let transport = |source| ApiError::Transport {
            path: path.to_string(),
            source,
        };

        let response = request.send().await.map_err(|e| {
            warn!(method = %method, path = %path, error = %e, "Backend request failed");
            transport(e)
        })?;

        let status = response.status();
        let text = response.text().await.map_err(transport)?;

        if !status.is_success() {
            warn!(
                method = %method,
                path = %path,
                status = status.as_u16(),
                "Backend returned error status"
            );
            return Err(ApiError::Status {
                method,
                path: path.to_string(),
                status,
                body: text,
            });
        }

        Ok(parse_body(&text))
    }
}

fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Decode a JSON value returned from `path` into `T`.
///
/// # Errors
///
/// Returns [`ApiError::Decode`] if the value does not match `T`.
pub fn decode<T: DeserializeOwned>(path: &str, value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|source| {
        warn!(path = %path, error = %source, "Unexpected backend response shape");
        ApiError::Decode {
            path: path.to_string(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_join_uses_single_slash() {
        let gateway = Gateway::with_client(reqwest::Client::new(), "http://localhost:2002/api/");
        assert_eq!(gateway.url_for("users"), "http://localhost:2002/api/users");
        assert_eq!(
            gateway.url_for("/users/total"),
            "http://localhost:2002/api/users/total"
        );
    }

    #[test]
    fn test_empty_body_is_null() {
        assert_eq!(parse_body(""), Value::Null);
        assert_eq!(parse_body("  \n"), Value::Null);
    }

    #[test]
    fn test_plain_text_body_is_string() {
        assert_eq!(
            parse_body("Post approved"),
            Value::String("Post approved".to_string())
        );
        assert_eq!(parse_body("[1,2]"), serde_json::json!([1, 2]));
    }

    #[tokio::test]
    async fn test_unencodable_body_is_not_sent() {
        let gateway = Gateway::with_client(reqwest::Client::new(), "http://127.0.0.1:9/api");
        let body = std::collections::HashMap::from([((1_u8, 2_u8), "tuple keys")]);

        let err = gateway
            .send_json("admins", Method::POST, &body)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Encode { ref path, .. } if path == "admins"));
        assert!(err.to_string().starts_with("cannot encode request body for admins"));
    }

    #[test]
    fn test_decode_error_names_path() {
        let err = decode::<Vec<u64>>("users", serde_json::json!({"a": 1})).unwrap_err();
        assert!(matches!(err, ApiError::Decode { ref path, .. } if path == "users"));
    }
}

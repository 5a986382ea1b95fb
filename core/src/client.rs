//! Stateless HTTP request builder and response parser for the user resource.
//!
//! # Design
//! `UserClient` holds only a `base_url` and carries no mutable state between
//! calls. Each CRUD operation is split into a `build_*` method that produces
//! an `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The caller executes the actual HTTP round-trip, keeping the core
//! deterministic and free of I/O dependencies.
//!
//! Any 2xx status is success; the body is never consulted to decide that.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Draft, User};

/// Environment variable holding the remote resource's base URL.
pub const BASE_URL_ENV: &str = "USERS_API_BASE_URL";

/// Public demo API used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// Synchronous, stateless client for the user resource.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network.
#[derive(Debug, Clone)]
pub struct UserClient {
    base_url: String,
}

impl UserClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Reads `USERS_API_BASE_URL`, falling back to [`DEFAULT_BASE_URL`].
    pub fn from_env() -> Self {
        match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::new(DEFAULT_BASE_URL),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_users(&self) -> HttpRequest {
        self.bare(HttpMethod::Get, format!("{}/users", self.base_url))
    }

    pub fn build_get_user(&self, id: u64) -> HttpRequest {
        self.bare(HttpMethod::Get, format!("{}/users/{id}", self.base_url))
    }

    pub fn build_create_user(&self, draft: &Draft) -> Result<HttpRequest, ApiError> {
        self.with_json(HttpMethod::Post, format!("{}/users", self.base_url), draft)
    }

    /// The full user is sent; the server's reply is what callers keep.
    pub fn build_update_user(&self, user: &User) -> Result<HttpRequest, ApiError> {
        self.with_json(HttpMethod::Put, format!("{}/users/{}", self.base_url, user.id), user)
    }

    pub fn build_delete_user(&self, id: u64) -> HttpRequest {
        self.bare(HttpMethod::Delete, format!("{}/users/{id}", self.base_url))
    }

    pub fn parse_list_users(&self, response: HttpResponse) -> Result<Vec<User>, ApiError> {
        check_status(&response)?;
        decode(&response)
    }

    pub fn parse_get_user(&self, response: HttpResponse) -> Result<User, ApiError> {
        check_status(&response)?;
        decode(&response)
    }

    pub fn parse_create_user(&self, response: HttpResponse) -> Result<User, ApiError> {
        check_status(&response)?;
        decode(&response)
    }

    pub fn parse_update_user(&self, response: HttpResponse) -> Result<User, ApiError> {
        check_status(&response)?;
        decode(&response)
    }

    /// The body of a successful delete is ignored.
    pub fn parse_delete_user(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    fn bare(&self, method: HttpMethod, path: String) -> HttpRequest {
        HttpRequest {
            method,
            path,
            headers: Vec::new(),
            body: None,
        }
    }

    fn with_json<T: Serialize>(
        &self,
        method: HttpMethod,
        path: String,
        payload: &T,
    ) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(payload).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method,
            path,
            headers: vec![("content-type".to_string(), JSON_CONTENT_TYPE.to_string())],
            body: Some(body),
        })
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

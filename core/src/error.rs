//! Error types for the user resource client and the stores built on it.
//!
//! # Design
//! `ApiError` describes why a single request/response pair failed. `NotFound`
//! gets a dedicated variant because callers distinguish "the user does not
//! exist" from "the server returned an unexpected status." All other non-2xx
//! responses land in `HttpError` with the raw status code and body.
//!
//! `SyncError` is what the stores hand back to screens. Every `ApiError` is
//! folded into `Fetch` (reads) or `Submit` (writes) at the operation
//! boundary, so a screen only ever has to tell those apart from a local
//! `Validation` failure.

use thiserror::Error;

use crate::status::OperationKey;

/// Errors returned by `UserClient` build and parse methods.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The server returned 404: the requested user does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// No response was received at all.
    #[error(transparent)]
    Transport(#[from] crate::http::TransportError),
}

/// A required field was empty. Raised before any request is built.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("{field} is required")]
pub struct ValidationError {
    pub field: &'static str,
}

/// Errors returned by the list and detail stores.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyncError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// `List` or `Get` failed; the screen shows an error state.
    #[error("fetch failed: {0}")]
    Fetch(#[source] ApiError),

    /// `Create`, `Update` or `Delete` failed; existing content is kept.
    #[error("submit failed: {0}")]
    Submit(#[source] ApiError),

    /// The same operation is already in flight.
    #[error("{0} is already in flight")]
    Busy(OperationKey),

    /// The store was discarded before the response arrived. Nothing was
    /// applied.
    #[error("{0} resolved after its screen was discarded")]
    Cancelled(OperationKey),

    /// The update targets a user this screen does not hold. No request is
    /// built.
    #[error("user {0} is not on this screen")]
    UnknownUser(u64),

    /// The pending operation is of a kind this store never starts.
    #[error("{0} does not belong to this store")]
    Foreign(OperationKey),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::TransportError;

    #[test]
    fn messages() {
        assert_eq!(ApiError::NotFound.to_string(), "resource not found");
        let err = ApiError::HttpError {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 500: boom");
        assert_eq!(ValidationError { field: "phone" }.to_string(), "phone is required");
        assert_eq!(
            SyncError::Busy(OperationKey::Delete(4)).to_string(),
            "delete user 4 is already in flight"
        );
        assert_eq!(SyncError::UnknownUser(42).to_string(), "user 42 is not on this screen");
        assert_eq!(
            SyncError::Foreign(OperationKey::Get(1)).to_string(),
            "get user 1 does not belong to this store"
        );
    }

    #[test]
    fn transport_error_converts() {
        let err: ApiError = TransportError("connection refused".to_string()).into();
        assert_eq!(err.to_string(), "transport failed: connection refused");
        assert_eq!(SyncError::Fetch(err).to_string(), "fetch failed: transport failed: connection refused");
    }
}

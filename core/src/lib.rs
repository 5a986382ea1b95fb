//! Data synchronization layer between user-facing screens and a remote
//! user resource.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern), and keeps the screen state
//! those responses feed: the ordered user list, a single user's detail, and
//! which operations are in flight.
//!
//! # Design
//! - `UserClient` is stateless; it holds only `base_url`.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - `UserListStore` / `UserDetailStore` wrap the client with state. They
//!   mutate only when a response is resolved, and the server's copy of a
//!   user always wins over what was submitted.
//! - Failures are folded into `SyncError`: `Validation` (local, no request),
//!   `Fetch` (reads) or `Submit` (writes).

pub mod client;
pub mod collection;
pub mod error;
pub mod http;
pub mod status;
pub mod store;
pub mod types;

pub use client::UserClient;
pub use collection::UserCollection;
pub use error::{ApiError, SyncError, ValidationError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
pub use status::{OpStatus, OperationKey, OperationTracker};
pub use store::{Applied, Pending, UserDetailStore, UserListStore};
pub use types::{Address, Company, Draft, User};

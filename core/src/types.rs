//! Domain DTOs for the user resource.
//!
//! # Design
//! These types mirror the remote resource's JSON but are defined
//! independently from the mock-server crate; integration tests catch schema
//! drift. `User` always carries a server-assigned `id`. `Draft` is the same
//! record without one and is what the create form owns until submission.
//!
//! Nested `company` and `address` records are display-only: nothing in this
//! crate edits them, but they are carried through updates untouched.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A user record as returned by the remote resource.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<Company>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub name: String,
    pub catch_phrase: String,
    pub bs: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Address {
    pub street: String,
    pub suite: String,
    pub city: String,
    pub zipcode: String,
}

/// Request payload for creating a user: a `User` without an `id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Draft {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<Company>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

impl Draft {
    pub fn new(name: impl Into<String>, email: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            ..Self::default()
        }
    }

    /// Fails on the first empty required field, in `name`, `email`, `phone`
    /// order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_fields(&self.name, &self.email, &self.phone)
    }
}

impl User {
    /// Same required-field rule as [`Draft::validate`]; the edit form
    /// exposes the same three inputs.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_fields(&self.name, &self.email, &self.phone)
    }
}

fn require_fields(name: &str, email: &str, phone: &str) -> Result<(), ValidationError> {
    for (field, value) in [("name", name), ("email", email), ("phone", phone)] {
        if value.is_empty() {
            return Err(ValidationError { field });
        }
    }
    Ok(())
}

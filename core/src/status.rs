//! Per-operation progress, keyed by which operation instance it is.
//!
//! A create form has one key; each row has its own update and delete keys.
//! Only a second `begin` on the *same* key is refused, so deleting one row
//! while editing another is fine.

use std::collections::HashMap;
use std::fmt;

use crate::error::SyncError;

/// Identity of one operation instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKey {
    List,
    Get(u64),
    Create,
    Update(u64),
    Delete(u64),
}

impl OperationKey {
    /// `List` and `Get` read; everything else writes.
    pub fn is_read(self) -> bool {
        matches!(self, OperationKey::List | OperationKey::Get(_))
    }

    /// The user id a per-row key is about.
    pub fn row(self) -> Option<u64> {
        match self {
            OperationKey::Get(id) | OperationKey::Update(id) | OperationKey::Delete(id) => Some(id),
            OperationKey::List | OperationKey::Create => None,
        }
    }
}

impl fmt::Display for OperationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKey::List => write!(f, "list users"),
            OperationKey::Get(id) => write!(f, "get user {id}"),
            OperationKey::Create => write!(f, "create user"),
            OperationKey::Update(id) => write!(f, "update user {id}"),
            OperationKey::Delete(id) => write!(f, "delete user {id}"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OpStatus {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Default)]
pub struct OperationTracker {
    statuses: HashMap<OperationKey, OpStatus>,
}

impl OperationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `key` in flight, refusing if it already is.
    pub fn begin(&mut self, key: OperationKey) -> Result<(), SyncError> {
        let status = self.statuses.entry(key).or_default();
        if *status == OpStatus::InFlight {
            return Err(SyncError::Busy(key));
        }
        *status = OpStatus::InFlight;
        Ok(())
    }

    pub fn finish(&mut self, key: OperationKey, ok: bool) {
        let status = if ok { OpStatus::Succeeded } else { OpStatus::Failed };
        self.statuses.insert(key, status);
    }

    pub fn status(&self, key: &OperationKey) -> OpStatus {
        self.statuses.get(key).copied().unwrap_or_default()
    }

    pub fn is_in_flight(&self, key: &OperationKey) -> bool {
        self.status(key) == OpStatus::InFlight
    }

    /// Returns `key` to `Idle`, whatever state it was in.
    pub fn forget(&mut self, key: &OperationKey) {
        self.statuses.remove(key);
    }

    /// Drops settled entries that `keep` rejects. In-flight entries always
    /// stay, so their `Busy` guard holds until they resolve.
    pub fn prune(&mut self, keep: impl Fn(&OperationKey) -> bool) {
        self.statuses
            .retain(|key, status| *status == OpStatus::InFlight || keep(key));
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    pub fn clear(&mut self) {
        self.statuses.clear();
    }
}

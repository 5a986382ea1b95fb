//! Screen-side state and the operations that change it.
//!
//! # Design
//! Each store splits an operation in two, like `UserClient` does:
//! `begin_*` validates, marks the operation in flight and returns a
//! [`Pending`] holding the request; `resolve` takes the host's outcome for
//! that request and applies it. Nothing is mutated between the two, so
//! concurrent operations land in the order their responses arrive.
//!
//! Every `Pending` is stamped with the store's session. `discard` starts a
//! new session, after which older pendings resolve to
//! `SyncError::Cancelled` and touch nothing. The request itself is not
//! aborted; that is up to the host. A host that drops a request without
//! resolving it hands the `Pending` to `abandon`, which puts its key back to
//! `Idle`.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, warn};

use crate::client::UserClient;
use crate::collection::UserCollection;
use crate::error::{ApiError, SyncError};
use crate::http::{HttpRequest, HttpResponse, Transport, TransportError};
use crate::status::{OpStatus, OperationKey, OperationTracker};
use crate::types::{Draft, User};

static NEXT_SESSION: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SessionId(u64);

impl SessionId {
    fn fresh() -> Self {
        Self(NEXT_SESSION.fetch_add(1, Ordering::Relaxed))
    }
}

/// An operation that has been started but not resolved.
///
/// Execute [`Pending::request`] and hand the outcome back to the store that
/// produced it.
#[derive(Debug)]
#[must_use = "a pending operation stays in flight until it is resolved"]
pub struct Pending {
    key: OperationKey,
    session: SessionId,
    request: HttpRequest,
}

impl Pending {
    pub fn key(&self) -> OperationKey {
        self.key
    }

    pub fn request(&self) -> &HttpRequest {
        &self.request
    }
}

/// What a successful resolution changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// The collection now holds this many users.
    Listed(usize),
    Fetched(User),
    Created(User),
    /// `replaced` is false when no held user had the returned id.
    Updated { user: User, replaced: bool },
    /// `removed` is false when the id was already gone.
    Deleted { id: u64, removed: bool },
}

#[derive(Debug)]
struct Session {
    id: SessionId,
    tracker: OperationTracker,
}

impl Session {
    fn new() -> Self {
        Self {
            id: SessionId::fresh(),
            tracker: OperationTracker::new(),
        }
    }

    fn begin(
        &mut self,
        key: OperationKey,
        request: Result<HttpRequest, ApiError>,
    ) -> Result<Pending, SyncError> {
        let request = request.map_err(|e| classify(key, e))?;
        self.tracker.begin(key)?;
        debug!(op = %key, method = request.method.as_str(), path = %request.path, "operation started");
        Ok(Pending {
            key,
            session: self.id,
            request,
        })
    }

    fn accept(&self, pending: &Pending) -> Result<(), SyncError> {
        if pending.session != self.id {
            warn!(op = %pending.key, "response arrived after discard, dropping it");
            return Err(SyncError::Cancelled(pending.key));
        }
        Ok(())
    }

    fn finish<T>(&mut self, key: OperationKey, result: Result<T, ApiError>) -> Result<T, SyncError> {
        self.tracker.finish(key, result.is_ok());
        result.map_err(|e| {
            warn!(op = %key, error = %e, "operation failed");
            classify(key, e)
        })
    }

    fn abandon(&mut self, pending: Pending) {
        if pending.session == self.id {
            debug!(op = %pending.key, "operation abandoned");
            self.tracker.forget(&pending.key);
        }
    }

    fn discard(&mut self) {
        self.id = SessionId::fresh();
        self.tracker.clear();
    }
}

fn classify(key: OperationKey, err: ApiError) -> SyncError {
    if key.is_read() {
        SyncError::Fetch(err)
    } else {
        SyncError::Submit(err)
    }
}

/// State behind the list screen: the collection plus per-row progress.
#[derive(Debug)]
pub struct UserListStore {
    client: UserClient,
    users: UserCollection,
    session: Session,
}

impl UserListStore {
    /// Starts empty; call [`begin_list`](Self::begin_list) to populate.
    pub fn new(client: UserClient) -> Self {
        Self {
            client,
            users: UserCollection::new(),
            session: Session::new(),
        }
    }

    pub fn users(&self) -> &UserCollection {
        &self.users
    }

    pub fn status(&self, key: &OperationKey) -> OpStatus {
        self.session.tracker.status(key)
    }

    pub fn begin_list(&mut self) -> Result<Pending, SyncError> {
        let request = self.client.build_list_users();
        self.session.begin(OperationKey::List, Ok(request))
    }

    /// Fails with `SyncError::Validation` before building any request if a
    /// required field is empty.
    pub fn begin_create(&mut self, draft: &Draft) -> Result<Pending, SyncError> {
        draft.validate()?;
        let request = self.client.build_create_user(draft);
        self.session.begin(OperationKey::Create, request)
    }

    /// Only users currently in the collection can be updated.
    pub fn begin_update(&mut self, user: &User) -> Result<Pending, SyncError> {
        user.validate()?;
        if self.users.get(user.id).is_none() {
            return Err(SyncError::UnknownUser(user.id));
        }
        let request = self.client.build_update_user(user);
        self.session.begin(OperationKey::Update(user.id), request)
    }

    pub fn begin_delete(&mut self, id: u64) -> Result<Pending, SyncError> {
        let request = self.client.build_delete_user(id);
        self.session.begin(OperationKey::Delete(id), Ok(request))
    }

    /// Applies the outcome of a pending request.
    ///
    /// On failure the collection is left exactly as it was.
    pub fn resolve(
        &mut self,
        pending: Pending,
        outcome: Result<HttpResponse, TransportError>,
    ) -> Result<Applied, SyncError> {
        self.session.accept(&pending)?;
        let key = pending.key;
        let response = outcome.map_err(ApiError::from);
        let applied = match key {
            OperationKey::List => {
                let parsed = response.and_then(|r| self.client.parse_list_users(r));
                let users = self.session.finish(key, parsed)?;
                self.users.replace_all(users);
                Applied::Listed(self.users.len())
            }
            OperationKey::Create => {
                let parsed = response.and_then(|r| self.client.parse_create_user(r));
                let user = self.session.finish(key, parsed)?;
                self.users.append(user.clone());
                Applied::Created(user)
            }
            OperationKey::Update(_) => {
                let parsed = response.and_then(|r| self.client.parse_update_user(r));
                let user = self.session.finish(key, parsed)?;
                let replaced = self.users.replace(user.clone());
                if !replaced {
                    debug!(op = %key, id = user.id, "no row left to replace");
                }
                Applied::Updated { user, replaced }
            }
            OperationKey::Delete(id) => {
                let parsed = response.and_then(|r| self.client.parse_delete_user(r));
                self.session.finish(key, parsed)?;
                let removed = self.users.remove(id);
                Applied::Deleted { id, removed }
            }
            OperationKey::Get(_) => return Err(SyncError::Foreign(key)),
        };
        if matches!(applied, Applied::Listed(_) | Applied::Deleted { .. }) {
            self.prune_rows();
        }
        debug!(op = %key, "operation applied");
        Ok(applied)
    }

    /// Executes `pending` on `transport` and resolves it.
    pub fn perform<T: Transport + ?Sized>(
        &mut self,
        transport: &T,
        pending: Pending,
    ) -> Result<Applied, SyncError> {
        let outcome = transport.execute(pending.request());
        self.resolve(pending, outcome)
    }

    pub fn list<T: Transport + ?Sized>(&mut self, transport: &T) -> Result<Applied, SyncError> {
        let pending = self.begin_list()?;
        self.perform(transport, pending)
    }

    pub fn create<T: Transport + ?Sized>(
        &mut self,
        transport: &T,
        draft: &Draft,
    ) -> Result<Applied, SyncError> {
        let pending = self.begin_create(draft)?;
        self.perform(transport, pending)
    }

    pub fn update<T: Transport + ?Sized>(
        &mut self,
        transport: &T,
        user: &User,
    ) -> Result<Applied, SyncError> {
        let pending = self.begin_update(user)?;
        self.perform(transport, pending)
    }

    pub fn delete<T: Transport + ?Sized>(&mut self, transport: &T, id: u64) -> Result<Applied, SyncError> {
        let pending = self.begin_delete(id)?;
        self.perform(transport, pending)
    }

    /// Gives up on `pending` without a response: its key goes back to
    /// `Idle` and nothing else changes. Use it when the host drops the
    /// request instead of resolving it.
    pub fn abandon(&mut self, pending: Pending) {
        self.session.abandon(pending);
    }

    /// Forgets settled row statuses for users no longer in the collection.
    fn prune_rows(&mut self) {
        let users = &self.users;
        self.session
            .tracker
            .prune(|key| key.row().map_or(true, |id| users.get(id).is_some()));
    }

    /// Ends the screen's session. Outstanding pendings become
    /// `SyncError::Cancelled` when resolved; the collection is emptied.
    pub fn discard(&mut self) {
        self.session.discard();
        self.users = UserCollection::new();
    }
}

/// State behind the detail screen: one user, fetched by id.
#[derive(Debug)]
pub struct UserDetailStore {
    client: UserClient,
    id: u64,
    user: Option<User>,
    session: Session,
}

impl UserDetailStore {
    pub fn new(client: UserClient, id: u64) -> Self {
        Self {
            client,
            id,
            user: None,
            session: Session::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// `None` until a fetch succeeds.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn status(&self, key: &OperationKey) -> OpStatus {
        self.session.tracker.status(key)
    }

    pub fn begin_fetch(&mut self) -> Result<Pending, SyncError> {
        let request = self.client.build_get_user(self.id);
        self.session.begin(OperationKey::Get(self.id), Ok(request))
    }

    /// Only the user this screen shows can be updated from it.
    pub fn begin_update(&mut self, user: &User) -> Result<Pending, SyncError> {
        user.validate()?;
        if user.id != self.id {
            return Err(SyncError::UnknownUser(user.id));
        }
        let request = self.client.build_update_user(user);
        self.session.begin(OperationKey::Update(user.id), request)
    }

    pub fn resolve(
        &mut self,
        pending: Pending,
        outcome: Result<HttpResponse, TransportError>,
    ) -> Result<Applied, SyncError> {
        self.session.accept(&pending)?;
        let key = pending.key;
        let response = outcome.map_err(ApiError::from);
        let applied = match key {
            OperationKey::Get(_) => {
                let parsed = response.and_then(|r| self.client.parse_get_user(r));
                let user = self.session.finish(key, parsed)?;
                self.user = Some(user.clone());
                Applied::Fetched(user)
            }
            OperationKey::Update(_) => {
                let parsed = response.and_then(|r| self.client.parse_update_user(r));
                let user = self.session.finish(key, parsed)?;
                let replaced = user.id == self.id;
                if replaced {
                    self.user = Some(user.clone());
                }
                Applied::Updated { user, replaced }
            }
            OperationKey::List | OperationKey::Create | OperationKey::Delete(_) => {
                return Err(SyncError::Foreign(key));
            }
        };
        debug!(op = %key, "operation applied");
        Ok(applied)
    }

    pub fn perform<T: Transport + ?Sized>(
        &mut self,
        transport: &T,
        pending: Pending,
    ) -> Result<Applied, SyncError> {
        let outcome = transport.execute(pending.request());
        self.resolve(pending, outcome)
    }

    pub fn fetch<T: Transport + ?Sized>(&mut self, transport: &T) -> Result<Applied, SyncError> {
        let pending = self.begin_fetch()?;
        self.perform(transport, pending)
    }

    pub fn update<T: Transport + ?Sized>(
        &mut self,
        transport: &T,
        user: &User,
    ) -> Result<Applied, SyncError> {
        let pending = self.begin_update(user)?;
        self.perform(transport, pending)
    }

    pub fn abandon(&mut self, pending: Pending) {
        self.session.abandon(pending);
    }

    pub fn discard(&mut self) {
        self.session.discard();
        self.user = None;
    }
}

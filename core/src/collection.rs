//! The in-memory, ordered list of users held by the list screen.
//!
//! Order is fetch order from the last successful list, with creates
//! appended. `id` is unique within the collection at all times.

use crate::types::User;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserCollection {
    users: Vec<User>,
}

impl UserCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole collection with a fresh list response.
    ///
    /// If the response repeats an id, the later element wins and takes the
    /// earlier one's position.
    pub fn replace_all(&mut self, users: Vec<User>) {
        self.users.clear();
        for user in users {
            self.append(user);
        }
    }

    /// Appends a newly created user. An id that is already present is
    /// replaced in place instead.
    pub fn append(&mut self, user: User) {
        if !self.replace(user.clone()) {
            self.users.push(user);
        }
    }

    /// Swaps in the server's copy of a user. Returns `false` and leaves the
    /// collection untouched when no element has that id.
    pub fn replace(&mut self, user: User) -> bool {
        match self.users.iter_mut().find(|u| u.id == user.id) {
            Some(slot) => {
                *slot = user;
                true
            }
            None => false,
        }
    }

    /// Removes the user with `id`, keeping everyone else in order.
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.users.len();
        self.users.retain(|u| u.id != id);
        self.users.len() != before
    }

    pub fn get(&self, id: u64) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, User> {
        self.users.iter()
    }

    pub fn as_slice(&self) -> &[User] {
        &self.users
    }
}

impl<'a> IntoIterator for &'a UserCollection {
    type Item = &'a User;
    type IntoIter = std::slice::Iter<'a, User>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

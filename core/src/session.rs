//! Shared header state for one logical client.
//!
//! # Design
//! `Session` is a handle: clones share the same header list, so a token set
//! by the auth client is seen by the movies and user clients built from the
//! same session. Everything runs on one thread, hence `Rc<RefCell<_>>` and no
//! locking. Callers that want isolation create a fresh session.

use std::cell::RefCell;
use std::rc::Rc;

use crate::http::find_header;

pub const AUTHORIZATION: &str = "Authorization";

const BASE_HEADERS: [(&str, &str); 2] = [
    ("Content-Type", "application/json"),
    ("Accept", "application/json"),
];

#[derive(Debug, Clone)]
pub struct Session {
    headers: Rc<RefCell<Vec<(String, String)>>>,
}

impl Session {
    /// A session carrying the JSON content-negotiation headers.
    pub fn new() -> Self {
        let headers = BASE_HEADERS
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        Self {
            headers: Rc::new(RefCell::new(headers)),
        }
    }

    /// Sets a header, replacing any existing value with the same name.
    pub fn set_header(&self, name: &str, value: impl Into<String>) {
        let value = value.into();
        let mut headers = self.headers.borrow_mut();
        match headers
            .iter_mut()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
        {
            Some(entry) => entry.1 = value,
            None => headers.push((name.to_string(), value)),
        }
    }

    pub fn remove_header(&self, name: &str) -> Option<String> {
        let mut headers = self.headers.borrow_mut();
        let index = headers
            .iter()
            .position(|(key, _)| key.eq_ignore_ascii_case(name))?;
        Some(headers.remove(index).1)
    }

    pub fn header(&self, name: &str) -> Option<String> {
        find_header(&self.headers.borrow(), name).map(str::to_string)
    }

    /// Snapshot of the current headers, in insertion order.
    pub fn headers(&self) -> Vec<(String, String)> {
        self.headers.borrow().clone()
    }

    pub fn set_bearer_token(&self, token: &str) {
        self.set_header(AUTHORIZATION, format!("Bearer {token}"));
    }

    pub fn bearer_token(&self) -> Option<String> {
        self.header(AUTHORIZATION)?
            .strip_prefix("Bearer ")
            .map(str::to_string)
    }

    /// Drops the authorization header, turning the session anonymous again.
    pub fn clear_auth(&self) {
        self.remove_header(AUTHORIZATION);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

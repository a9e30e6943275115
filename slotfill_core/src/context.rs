//! Per-conversation slot state.
//!
//! The host engine owns the conversation context; the slot functions only
//! need the latest request and a mutable value storage, which is what
//! [`SlotContext`] exposes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Extracted values of one conversation, keyed by qualified slot path.
///
/// A path mapped to `None` has been extracted without finding anything;
/// an absent path has never been extracted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotStorage {
    values: BTreeMap<String, Option<String>>,
}

impl SlotStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.values.contains_key(path)
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Option<String>> {
        self.values.get(path)
    }

    /// Stored value of `path`, `None` when absent or unset.
    #[must_use]
    pub fn value(&self, path: &str) -> Option<&str> {
        self.values.get(path).and_then(Option::as_deref)
    }

    #[must_use]
    pub fn is_set(&self, path: &str) -> bool {
        self.value(path).is_some()
    }

    pub fn insert(&mut self, path: impl Into<String>, value: Option<String>) {
        self.values.insert(path.into(), value);
    }

    pub fn remove(&mut self, path: &str) -> Option<Option<String>> {
        self.values.remove(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.values
            .iter()
            .map(|(path, value)| (path.as_str(), value.as_deref()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl Extend<(String, Option<String>)> for SlotStorage {
    fn extend<T: IntoIterator<Item = (String, Option<String>)>>(&mut self, iter: T) {
        self.values.extend(iter);
    }
}

/// What the slot functions need from a conversation context.
pub trait SlotContext {
    /// Latest user input, if any was received.
    fn last_request(&self) -> Option<&str>;

    /// Slot storage, `None` until the storage hook has run.
    fn slot_storage(&self) -> Option<&SlotStorage>;

    fn slot_storage_mut(&mut self) -> Option<&mut SlotStorage>;
}

/// Standalone context for using slots without a dialogue engine.
#[derive(Debug, Clone)]
pub struct SlotSession {
    pub id: Uuid,
    pub requests: Vec<String>,
    pub storage: Option<SlotStorage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SlotSession {
    /// Session with an empty, initialised storage.
    #[must_use]
    pub fn new() -> Self {
        let mut session = Self::without_storage();
        session.storage = Some(SlotStorage::new());
        session
    }

    /// Session whose storage hook has not run yet.
    #[must_use]
    pub fn without_storage() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            requests: Vec::new(),
            storage: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn add_request(&mut self, request: impl Into<String>) {
        self.requests.push(request.into());
        self.updated_at = Utc::now();
    }
}

impl Default for SlotSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SlotContext for SlotSession {
    fn last_request(&self) -> Option<&str> {
        self.requests.last().map(String::as_str)
    }

    fn slot_storage(&self) -> Option<&SlotStorage> {
        self.storage.as_ref()
    }

    fn slot_storage_mut(&mut self) -> Option<&mut SlotStorage> {
        self.storage.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_distinguishes_absent_and_unset() {
        let mut storage = SlotStorage::new();
        storage.insert("email", None);

        assert!(storage.contains("email"));
        assert!(!storage.is_set("email"));
        assert!(!storage.contains("name"));
        assert_eq!(storage.get("name"), None);
        assert_eq!(storage.get("email"), Some(&None));
    }

    #[test]
    fn test_session_tracks_last_request() {
        let mut session = SlotSession::new();
        assert_eq!(session.last_request(), None);

        session.add_request("hi");
        session.add_request("my name is Groot");
        assert_eq!(session.last_request(), Some("my name is Groot"));
        assert!(session.slot_storage().is_some());
        assert!(SlotSession::without_storage().slot_storage().is_none());
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_storage_serializes_as_map() {
        let mut storage = SlotStorage::new();
        storage.insert("person/name", Some("Groot".to_string()));
        storage.insert("person/email", None);

        let json = serde_json::to_string(&storage).expect("storage should serialize");
        assert_eq!(json, r#"{"person/email":null,"person/name":"Groot"}"#);
    }
}
